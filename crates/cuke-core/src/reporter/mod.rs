//! Dispatcher de eventos del ciclo de vida.
mod builder;
mod core;
mod shared;

pub use builder::ReporterBuilder;
pub use self::core::{Reporter, ReporterState};
pub use shared::SharedReporter;
