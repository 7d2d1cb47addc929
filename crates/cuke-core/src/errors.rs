//! Errores específicos del core.
//!
//! `ReporterError` agrupa las condiciones fatales del mapeo evento -> reporte:
//! un desacuerdo entre el runner y el índice estructural no se recupera con
//! reintentos, así que se propaga al llamador y aborta el run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sink::ItemId;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum ReporterError {
    #[error("Scenario can't be resolved: `{name}` at {uri}:{line}")]
    ScenarioNotResolved { uri: String, line: usize, name: String },
    #[error("Trying to get step for unknown line in feature. Scenario: {scenario}, line: {line}")]
    UnknownStepLine { scenario: String, line: usize },
    #[error("Scenario URI does not match Feature URI: expected {expected}, found {found}")]
    FeatureUriMismatch { expected: String, found: String },
    #[error("Attempting re-set scenario ID for unfinished scenario `{name}`")]
    ScenarioItemAlreadySet { name: String },
    #[error("no feature is open for {uri}")]
    NoFeatureOpen { uri: String },
    #[error("no scenario is open")]
    NoScenarioOpen,
    #[error("no source was read for {uri}")]
    MissingSource { uri: String },
    #[error("reporter lock poisoned")]
    LockPoisoned,
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Fallos del backend de reporting. El core no los reintenta ni los suprime.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum SinkError {
    #[error("unknown or already finished item {0}")]
    UnknownItem(ItemId),
    #[error("launch not started")]
    LaunchNotStarted,
    #[error("sink io error: {0}")]
    Io(String),
    #[error("sink serialization error: {0}")]
    Serialization(String),
    #[error("sink rejected request: {0}")]
    Rejected(String),
}

impl From<std::io::Error> for SinkError {
    fn from(e: std::io::Error) -> Self {
        SinkError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(e: serde_json::Error) -> Self {
        SinkError::Serialization(e.to_string())
    }
}
