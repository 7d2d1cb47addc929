//! cuke-core: mapeo de eventos del runner BDD a un reporte jerárquico.
pub mod constants;
pub mod context;
pub mod errors;
pub mod event;
pub mod mode;
pub mod naming;
pub mod registry;
pub mod reporter;
pub mod sink;

pub use context::{FeatureContext, ScenarioContext};
pub use errors::{ReporterError, SinkError};
pub use event::{EventBus, EventHandler, EventKind, HookTestStep, HookType, LifecycleEvent, PickleArgument, PickleStep,
                PickleStepTestStep, Status, StepResult, TestCase, TestStep};
pub use mode::{report_result, ModeCtx, ReportMode, StepReporter};
pub use naming::{build_name, map_level, media_type_name, render_argument, step_display_name};
pub use registry::{OutlineKey, RunRegistry};
pub use reporter::{Reporter, ReporterBuilder, ReporterState, SharedReporter};
pub use sink::{Attachment, FinishItemRq, FinishLaunchRq, ItemId, ItemType, LaunchMode, LaunchSettings, LogLevel, LogRq,
               RecordingSink, ReportSink, SinkCall, StartItemRq, StartLaunchRq, TagSet};
