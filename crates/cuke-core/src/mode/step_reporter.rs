use log::{debug, warn};

use super::{report_result, ModeCtx, ReportMode};
use crate::errors::ReporterError;
use crate::event::{HookTestStep, HookType, PickleStepTestStep, Status, StepResult};
use crate::naming::{build_name, render_argument};
use crate::sink::{FinishItemRq, ItemId, ItemType, StartItemRq};

/// Hook en ejecución: su item y el estado agregado hasta ahora.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HookExecution {
    item: ItemId,
    status: Status,
}

/// Reporta cada step como item hoja (`STEP`) bajo su scenario.
///
/// Mapeo: feature -> `SUITE`, scenario -> `SCENARIO` (o `TEST`), step ->
/// `STEP`, grupos de hooks -> `BEFORE_TEST` / `AFTER_TEST` /
/// `BEFORE_METHOD` / `AFTER_METHOD`. Los steps del Background se reportan
/// dentro de cada scenario con el prefijo del keyword.
#[derive(Debug, Clone)]
pub struct StepReporter {
    scenario_type: ItemType,
    step_item: Option<ItemId>,
    hook: Option<HookExecution>,
}

impl Default for StepReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StepReporter {
    pub fn new() -> Self {
        Self { scenario_type: ItemType::Scenario,
               step_item: None,
               hook: None }
    }

    /// Cambia el tipo de los items de scenario (`SCENARIO` o `TEST`).
    pub fn with_scenario_type(mut self, scenario_type: ItemType) -> Self {
        self.scenario_type = scenario_type;
        self
    }

    fn hook_item(hook_type: HookType) -> (&'static str, ItemType) {
        match hook_type {
            HookType::Before => ("Before hooks", ItemType::BeforeTest),
            HookType::After => ("After hooks", ItemType::AfterTest),
            HookType::BeforeStep => ("Before step", ItemType::BeforeMethod),
            HookType::AfterStep => ("After step", ItemType::AfterMethod),
        }
    }
}

impl ReportMode for StepReporter {
    fn feature_item_type(&self) -> ItemType {
        ItemType::Suite
    }

    fn scenario_item_type(&self) -> ItemType {
        self.scenario_type
    }

    fn root_item_id(&self) -> Option<ItemId> {
        None
    }

    fn open_hook(&self) -> Option<ItemId> {
        self.hook.map(|h| h.item)
    }

    fn open_step(&self) -> Option<ItemId> {
        self.step_item
    }

    fn before_step(&mut self, cx: ModeCtx<'_>, step: &PickleStepTestStep, prefix: &str) -> Result<(), ReporterError> {
        let source = cx.scenario.resolve_step(&step.step)?;
        let name = build_name(Some(prefix), &source.keyword, &step.step.text, None);
        let mut rq = StartItemRq::new(ItemType::Step, name);
        let argument = render_argument(&step.step);
        if !argument.is_empty() {
            rq = rq.with_description(argument);
        }
        let id = cx.sink.start_item(cx.scenario.item(), rq)?;
        debug!("step:start line={} item={id}", step.step.line);
        self.step_item = Some(id);
        Ok(())
    }

    fn after_step(&mut self, cx: ModeCtx<'_>, result: &StepResult) -> Result<(), ReporterError> {
        report_result(cx.sink, self.step_item, result, None)?;
        match self.step_item.take() {
            Some(id) => {
                cx.sink.finish_item(id, FinishItemRq::with_status(result.status))?;
                debug!("step:finish item={id} status={}", result.status);
            }
            None => warn!("step:finish without an open step item"),
        }
        Ok(())
    }

    fn before_hooks(&mut self, cx: ModeCtx<'_>, hook_type: HookType) -> Result<(), ReporterError> {
        let (name, item_type) = Self::hook_item(hook_type);
        let item = cx.sink.start_item(cx.scenario.item(), StartItemRq::new(item_type, name))?;
        debug!("hooks:start type={hook_type} item={item}");
        self.hook = Some(HookExecution { item,
                                         status: Status::Passed });
        Ok(())
    }

    fn hook_finished(&mut self, cx: ModeCtx<'_>, hook: &HookTestStep, result: &StepResult) -> Result<(), ReporterError> {
        let when = if hook.hook_type.is_before() { "Before" } else { "After" };
        let message = format!("{when} hook: {}", hook.code_location);
        report_result(cx.sink, self.open_hook(), result, Some(&message))?;
        if let Some(h) = self.hook.as_mut() {
            h.status = result.status;
        }
        Ok(())
    }

    fn after_hooks(&mut self, cx: ModeCtx<'_>, is_before: bool) -> Result<(), ReporterError> {
        match self.hook.take() {
            Some(h) => {
                cx.sink.finish_item(h.item, FinishItemRq::with_status(h.status))?;
                debug!("hooks:finish before={is_before} item={} status={}", h.item, h.status);
            }
            None => warn!("hooks:finish without an open hook item (before={is_before})"),
        }
        Ok(())
    }
}
