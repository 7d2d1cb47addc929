//! Core Reporter implementation

use std::sync::Arc;

use log::{debug, error};

use crate::context::{FeatureContext, ScenarioContext};
use crate::errors::ReporterError;
use crate::event::{LifecycleEvent, StepResult, TestCase, TestStep};
use crate::mode::{ModeCtx, ReportMode, StepReporter};
use crate::naming::media_type_name;
use crate::registry::RunRegistry;
use crate::reporter::ReporterBuilder;
use crate::sink::{Attachment, FinishItemRq, FinishLaunchRq, ItemId, LaunchSettings, LogLevel, LogRq, ReportSink,
                  StartItemRq, StartLaunchRq};

/// Estado observable del dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterState {
    NoFeature,
    FeatureOpen,
    ScenarioOpen,
    HookOpen,
}

/// Traduce el flujo de `LifecycleEvent` a llamadas del `ReportSink`.
///
/// Procesa los eventos de uno en uno (`&mut self`); para varios hilos
/// productores hay que envolverlo en un `SharedReporter`. Cualquier error
/// estructural o del sink se devuelve tal cual y deja el reporte a medias:
/// el llamador debe abortar el run.
#[derive(Debug)]
pub struct Reporter<S, M = StepReporter>
    where S: ReportSink,
          M: ReportMode
{
    pub(crate) sink: S,
    pub(crate) mode: M,
    pub(crate) registry: Arc<RunRegistry>,
    pub(crate) launch: LaunchSettings,
    pub(crate) feature: Option<FeatureContext>,
    pub(crate) scenario: Option<ScenarioContext>,
}

impl<S: ReportSink> Reporter<S, StepReporter> {
    /// Reporter con el modo por defecto, registry propio y launch por defecto.
    pub fn new(sink: S) -> Self {
        Self::builder(sink).build()
    }

    /// Crea un builder para configurar el reporter
    #[inline]
    pub fn builder(sink: S) -> ReporterBuilder<S, StepReporter> {
        ReporterBuilder::new(sink)
    }
}

impl<S, M> Reporter<S, M>
    where S: ReportSink,
          M: ReportMode
{
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn registry(&self) -> &Arc<RunRegistry> {
        &self.registry
    }

    pub fn feature(&self) -> Option<&FeatureContext> {
        self.feature.as_ref()
    }

    pub fn scenario(&self) -> Option<&ScenarioContext> {
        self.scenario.as_ref()
    }

    pub fn state(&self) -> ReporterState {
        match (&self.feature, &self.scenario) {
            (None, _) => ReporterState::NoFeature,
            (Some(_), None) => ReporterState::FeatureOpen,
            (Some(_), Some(_)) if self.mode.open_hook().is_some() => ReporterState::HookOpen,
            (Some(_), Some(_)) => ReporterState::ScenarioOpen,
        }
    }

    /// Item más interno abierto: hook > step > scenario > feature. `None`
    /// cuando no hay nada abierto (los logs van al launch).
    pub fn current_item(&self) -> Option<ItemId> {
        self.mode
            .open_hook()
            .or_else(|| self.mode.open_step())
            .or_else(|| self.scenario.as_ref().and_then(ScenarioContext::item))
            .or_else(|| self.feature.as_ref().and_then(FeatureContext::item))
    }

    /// Procesa un evento.
    pub fn handle(&mut self, event: &LifecycleEvent) -> Result<(), ReporterError> {
        debug!("handle:start kind={:?} state={:?}", event.kind(), self.state());
        match event {
            LifecycleEvent::TestRunStarted => self.on_run_started(),
            LifecycleEvent::TestSourceRead { uri, source } => {
                self.registry.add_source(uri.as_str(), source.as_str());
                Ok(())
            }
            LifecycleEvent::TestCaseStarted { test_case } => self.on_test_case_started(test_case),
            LifecycleEvent::TestStepStarted { test_step, .. } => self.on_step_started(test_step),
            LifecycleEvent::TestStepFinished { test_step, result, .. } => self.on_step_finished(test_step, result),
            LifecycleEvent::TestCaseFinished { result, .. } => self.on_test_case_finished(result),
            LifecycleEvent::TestRunFinished => self.on_run_finished(),
            LifecycleEvent::Embed { media_type, data } => self.on_embed(media_type, data),
            LifecycleEvent::Write { text } => {
                let item = self.current_item();
                self.sink.log(item, LogRq::new(LogLevel::Info, text.as_str()))?;
                Ok(())
            }
        }
    }

    fn on_run_started(&mut self) -> Result<(), ReporterError> {
        self.registry.reset_outline_iterations();
        self.sink.start_launch(StartLaunchRq::from_settings(&self.launch))?;
        debug!("launch:start name={}", self.launch.name);
        Ok(())
    }

    fn on_run_finished(&mut self) -> Result<(), ReporterError> {
        self.close_feature()?;
        self.sink.finish_launch(FinishLaunchRq::now())?;
        debug!("launch:finish name={}", self.launch.name);
        Ok(())
    }

    fn open_feature(&mut self, uri: &str) -> Result<(), ReporterError> {
        let mut ctx = FeatureContext::open(uri, &self.registry)?;
        let rq = StartItemRq::new(self.mode.feature_item_type(), ctx.display_name()).with_description(uri)
                                                                                   .with_tags(ctx.tags().iter().cloned());
        let id = self.sink.start_item(self.mode.root_item_id(), rq)?;
        debug!("feature:start uri={uri} item={id}");
        ctx.set_item(id);
        self.feature = Some(ctx);
        Ok(())
    }

    fn close_feature(&mut self) -> Result<(), ReporterError> {
        if let Some(ctx) = self.feature.take() {
            if let Some(id) = ctx.item() {
                self.sink.finish_item(id, FinishItemRq::without_status())?;
                debug!("feature:finish uri={} item={id}", ctx.uri());
            }
        }
        Ok(())
    }

    fn on_test_case_started(&mut self, test_case: &TestCase) -> Result<(), ReporterError> {
        if let Some(open) = &self.scenario {
            return Err(fatal(ReporterError::ScenarioItemAlreadySet { name: open.scenario().name.clone() }));
        }
        if self.feature.as_ref().is_some_and(|f| f.uri() != test_case.uri) {
            self.close_feature()?;
        }
        if self.feature.is_none() {
            self.open_feature(&test_case.uri)?;
        }
        let feature = self.feature
                          .as_ref()
                          .ok_or_else(|| fatal(ReporterError::NoFeatureOpen { uri: test_case.uri.clone() }))?;
        if feature.uri() != test_case.uri {
            return Err(fatal(ReporterError::FeatureUriMismatch { expected: feature.uri().to_string(),
                                                                 found: test_case.uri.clone() }));
        }

        let mut ctx = ScenarioContext::open(feature, test_case, &self.registry)?;
        let rq = StartItemRq::new(self.mode.scenario_item_type(), ctx.display_name()).with_description(ctx.description())
                                                                                    .with_tags(ctx.tags().iter().cloned());
        let id = self.sink.start_item(feature.item(), rq)?;
        debug!("scenario:start line={} item={id}", test_case.line);
        ctx.set_item(id)?;
        self.scenario = Some(ctx);
        Ok(())
    }

    fn on_test_case_finished(&mut self, result: &StepResult) -> Result<(), ReporterError> {
        let ctx = self.scenario.take().ok_or_else(|| fatal(ReporterError::NoScenarioOpen))?;
        if let Some(id) = ctx.item() {
            self.sink.finish_item(id, FinishItemRq::with_status(result.status))?;
            debug!("scenario:finish item={id} status={}", result.status);
        }
        Ok(())
    }

    fn on_step_started(&mut self, test_step: &TestStep) -> Result<(), ReporterError> {
        let scenario = self.scenario.as_mut().ok_or_else(|| fatal(ReporterError::NoScenarioOpen))?;
        match test_step {
            TestStep::Hook(hook) => self.mode.before_hooks(ModeCtx { sink: &mut self.sink,
                                                                     scenario },
                                                           hook.hook_type),
            TestStep::Pickle(step) => {
                let prefix = scenario.step_prefix();
                if scenario.with_background() {
                    scenario.next_background_step();
                }
                self.mode.before_step(ModeCtx { sink: &mut self.sink,
                                                scenario },
                                      step,
                                      &prefix)
            }
        }
    }

    fn on_step_finished(&mut self, test_step: &TestStep, result: &StepResult) -> Result<(), ReporterError> {
        let scenario = self.scenario.as_ref().ok_or_else(|| fatal(ReporterError::NoScenarioOpen))?;
        match test_step {
            TestStep::Hook(hook) => {
                self.mode.hook_finished(ModeCtx { sink: &mut self.sink,
                                                  scenario },
                                        hook,
                                        result)?;
                self.mode.after_hooks(ModeCtx { sink: &mut self.sink,
                                                scenario },
                                      hook.hook_type.is_before())
            }
            TestStep::Pickle(_) => self.mode.after_step(ModeCtx { sink: &mut self.sink,
                                                                  scenario },
                                                        result),
        }
    }

    fn on_embed(&mut self, media_type: &str, data: &[u8]) -> Result<(), ReporterError> {
        let name = media_type_name(media_type);
        let attachment = Attachment { name: name.clone(),
                                      media_type: media_type.to_string(),
                                      content: data.to_vec() };
        let item = self.current_item();
        self.sink.log(item, LogRq::new(LogLevel::Unknown, name).with_attachment(attachment))?;
        Ok(())
    }
}

fn fatal(err: ReporterError) -> ReporterError {
    error!("reporter:fatal err={err}");
    err
}
