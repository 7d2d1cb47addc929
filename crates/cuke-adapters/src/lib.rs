//! cuke-adapters: sinks concretos, configuración por entorno y reproducción
//! de streams de eventos grabados.
pub mod config;
pub mod error;
pub mod jsonl_sink;
pub mod log_sink;
pub mod replay;

pub use config::{init_dotenv, ReporterConfig, SinkKind};
pub use error::AdapterError;
pub use jsonl_sink::{read_records, JsonLinesSink, SinkRecord};
pub use log_sink::LogSink;
pub use replay::{parse_event, read_events, replay, write_events};
