//! Estrategia de reporte de steps y hooks.
//!
//! El `Reporter` resuelve features y scenarios por su cuenta; cómo se
//! traducen los steps y hooks a items (o si se agregan) lo decide la
//! implementación de `ReportMode` elegida al construirlo.
mod step_reporter;

use log::debug;

use crate::context::ScenarioContext;
use crate::errors::ReporterError;
use crate::event::{HookTestStep, HookType, PickleStepTestStep, StepResult};
use crate::sink::{ItemId, ItemType, LogRq, ReportSink};

pub use step_reporter::StepReporter;

/// Lo que una estrategia puede tocar durante un evento: el sink y el
/// scenario abierto.
pub struct ModeCtx<'a> {
    pub sink: &'a mut dyn ReportSink,
    pub scenario: &'a ScenarioContext,
}

pub trait ReportMode {
    fn feature_item_type(&self) -> ItemType;
    fn scenario_item_type(&self) -> ItemType;

    /// Padre de los items de feature. `None` los cuelga del launch.
    fn root_item_id(&self) -> Option<ItemId>;

    /// Item de hook abierto, si lo hay.
    fn open_hook(&self) -> Option<ItemId>;
    /// Item de step abierto, si lo hay.
    fn open_step(&self) -> Option<ItemId>;

    /// `prefix` es el prefijo de Background ya calculado por el dispatcher.
    fn before_step(&mut self, cx: ModeCtx<'_>, step: &PickleStepTestStep, prefix: &str) -> Result<(), ReporterError>;
    fn after_step(&mut self, cx: ModeCtx<'_>, result: &StepResult) -> Result<(), ReporterError>;
    fn before_hooks(&mut self, cx: ModeCtx<'_>, hook_type: HookType) -> Result<(), ReporterError>;
    fn hook_finished(&mut self, cx: ModeCtx<'_>, hook: &HookTestStep, result: &StepResult) -> Result<(), ReporterError>;
    fn after_hooks(&mut self, cx: ModeCtx<'_>, is_before: bool) -> Result<(), ReporterError>;
}

/// Registra el error de `result` (si lo hay) y `message` (si se da) en
/// `item`, al nivel derivado del estado.
pub fn report_result(sink: &mut dyn ReportSink,
                     item: Option<ItemId>,
                     result: &StepResult,
                     message: Option<&str>)
                     -> Result<(), ReporterError> {
    let level = result.status.level();
    if let Some(error) = &result.error {
        debug!("report_result:error status={} level={level}", result.status);
        sink.log(item, LogRq::new(level, error.as_str()))?;
    }
    if let Some(message) = message {
        sink.log(item, LogRq::new(level, message))?;
    }
    Ok(())
}
