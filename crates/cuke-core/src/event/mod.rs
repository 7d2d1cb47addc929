//! Definiciones de eventos del runner y bus de publicación.

mod bus;
mod types;

pub use bus::{EventBus, EventHandler};
pub use types::{EventKind, HookTestStep, HookType, LifecycleEvent, PickleArgument, PickleStep, PickleStepTestStep,
                Status, StepResult, TestCase, TestStep};
