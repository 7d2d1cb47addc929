//! Errores de los adaptadores.
//! Envuelve fallos de IO, de formato JSON lines y de configuración, además
//! de los errores del core que surgen al reproducir un stream.

use cuke_core::{ReporterError, SinkError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AdapterError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid event at line {line}: {message}")]
    InvalidEvent { line: usize, message: String },
    #[error("invalid value for {key}: `{value}`")]
    InvalidConfig { key: String, value: String },
    #[error("{key} is required when {reason}")]
    MissingConfig { key: String, reason: String },
    #[error(transparent)]
    Reporter(#[from] ReporterError),
}

impl From<std::io::Error> for AdapterError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<SinkError> for AdapterError {
    fn from(e: SinkError) -> Self {
        Self::Reporter(ReporterError::Sink(e))
    }
}
