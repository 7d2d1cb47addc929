//! Builder para `Reporter`.
//!
//! Permite inyectar el `RunRegistry` (para compartirlo entre reporters o
//! inspeccionarlo desde fuera), los parámetros del launch y la estrategia de
//! reporte. Lo que no se indica toma su valor por defecto.
use std::sync::Arc;

use crate::mode::{ReportMode, StepReporter};
use crate::registry::RunRegistry;
use crate::reporter::Reporter;
use crate::sink::{LaunchSettings, ReportSink};

#[derive(Debug)]
pub struct ReporterBuilder<S: ReportSink, M: ReportMode> {
    sink: S,
    mode: M,
    registry: Option<Arc<RunRegistry>>,
    launch: LaunchSettings,
}

impl<S: ReportSink> ReporterBuilder<S, StepReporter> {
    pub fn new(sink: S) -> Self {
        Self { sink,
               mode: StepReporter::new(),
               registry: None,
               launch: LaunchSettings::default() }
    }
}

impl<S: ReportSink, M: ReportMode> ReporterBuilder<S, M> {
    /// Sustituye la estrategia de reporte.
    pub fn mode<M2: ReportMode>(self, mode: M2) -> ReporterBuilder<S, M2> {
        ReporterBuilder { sink: self.sink,
                          mode,
                          registry: self.registry,
                          launch: self.launch }
    }

    pub fn registry(mut self, registry: Arc<RunRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn launch(mut self, launch: LaunchSettings) -> Self {
        self.launch = launch;
        self
    }

    pub fn build(self) -> Reporter<S, M> {
        Reporter { sink: self.sink,
                   mode: self.mode,
                   registry: self.registry.unwrap_or_default(),
                   launch: self.launch,
                   feature: None,
                   scenario: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::ReporterState;
    use crate::sink::{ItemType, RecordingSink};

    #[test]
    fn test_builder_shares_injected_registry() {
        let registry = Arc::new(RunRegistry::new());
        let reporter = Reporter::builder(RecordingSink::new()).registry(Arc::clone(&registry))
                                                               .mode(StepReporter::new().with_scenario_type(ItemType::Test))
                                                               .build();
        assert!(Arc::ptr_eq(reporter.registry(), &registry));
        assert_eq!(reporter.state(), ReporterState::NoFeature);
        assert_eq!(reporter.current_item(), None);
    }
}
