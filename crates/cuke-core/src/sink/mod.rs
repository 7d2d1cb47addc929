//! Contrato del backend de reporting.
//!
//! El core no conoce el formato de cable del backend: sólo produce
//! peticiones `start/finish/log` tipadas y recibe a cambio `ItemId` opacos.
//! Las implementaciones concretas (log, JSON lines) viven en
//! `cuke-adapters`; aquí sólo está `RecordingSink`, usado en tests.
mod recording;

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SinkError;
use crate::event::Status;

pub use recording::{RecordingSink, SinkCall};

/// Handle opaco de un item del reporte (suite, scenario, step, hook).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Tipos de item usados en la jerarquía del reporte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Suite,
    Scenario,
    Test,
    Step,
    BeforeTest,
    AfterTest,
    BeforeMethod,
    AfterMethod,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Suite => "SUITE",
            ItemType::Scenario => "SCENARIO",
            ItemType::Test => "TEST",
            ItemType::Step => "STEP",
            ItemType::BeforeTest => "BEFORE_TEST",
            ItemType::AfterTest => "AFTER_TEST",
            ItemType::BeforeMethod => "BEFORE_METHOD",
            ItemType::AfterMethod => "AFTER_METHOD",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Unknown,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modo del launch tal como lo entiende el backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaunchMode {
    #[default]
    Default,
    Debug,
}

impl LaunchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchMode::Default => "DEFAULT",
            LaunchMode::Debug => "DEBUG",
        }
    }
}

/// Conjunto de tags con orden de inserción estable.
pub type TagSet = IndexSet<String>;

/// Parámetros del launch que no dependen de los eventos: vienen de la
/// configuración del proceso.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSettings {
    pub name: String,
    pub mode: LaunchMode,
    pub tags: TagSet,
    pub description: Option<String>,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self { name: crate::constants::DEFAULT_LAUNCH_NAME.to_string(),
               mode: LaunchMode::Default,
               tags: TagSet::new(),
               description: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartLaunchRq {
    pub name: String,
    pub mode: LaunchMode,
    pub tags: TagSet,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
}

impl StartLaunchRq {
    pub fn from_settings(settings: &LaunchSettings) -> Self {
        Self { name: settings.name.clone(),
               mode: settings.mode,
               tags: settings.tags.clone(),
               description: settings.description.clone(),
               start_time: Utc::now() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishLaunchRq {
    pub end_time: DateTime<Utc>,
}

impl FinishLaunchRq {
    pub fn now() -> Self {
        Self { end_time: Utc::now() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartItemRq {
    pub name: String,
    pub description: Option<String>,
    pub tags: TagSet,
    pub start_time: DateTime<Utc>,
    pub item_type: ItemType,
}

impl StartItemRq {
    pub fn new(item_type: ItemType, name: impl Into<String>) -> Self {
        Self { name: name.into(),
               description: None,
               tags: TagSet::new(),
               start_time: Utc::now(),
               item_type }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
        where I: IntoIterator<Item = T>,
              T: Into<String>
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Cierre de un item. `status == None` deja que el backend lo derive de
/// sus hijos (así se cierran las suites).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishItemRq {
    pub end_time: DateTime<Utc>,
    pub status: Option<Status>,
}

impl FinishItemRq {
    pub fn with_status(status: Status) -> Self {
        Self { end_time: Utc::now(),
               status: Some(status) }
    }

    pub fn without_status() -> Self {
        Self { end_time: Utc::now(),
               status: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub media_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRq {
    pub message: String,
    pub level: LogLevel,
    pub log_time: DateTime<Utc>,
    pub attachment: Option<Attachment>,
}

impl LogRq {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self { message: message.into(),
               level,
               log_time: Utc::now(),
               attachment: None }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Backend de reporting consumido por el `Reporter`.
///
/// Todas las llamadas son síncronas y bloqueantes. Un error se propaga al
/// llamador sin reintentos.
pub trait ReportSink {
    fn start_launch(&mut self, rq: StartLaunchRq) -> Result<(), SinkError>;
    fn finish_launch(&mut self, rq: FinishLaunchRq) -> Result<(), SinkError>;
    /// Abre un item bajo `parent` (o en la raíz del launch) y devuelve su handle.
    fn start_item(&mut self, parent: Option<ItemId>, rq: StartItemRq) -> Result<ItemId, SinkError>;
    fn finish_item(&mut self, item: ItemId, rq: FinishItemRq) -> Result<(), SinkError>;
    /// Registra un log asociado a `item`, o al launch si es `None`.
    fn log(&mut self, item: Option<ItemId>, rq: LogRq) -> Result<(), SinkError>;
}

impl<S: ReportSink + ?Sized> ReportSink for Box<S> {
    fn start_launch(&mut self, rq: StartLaunchRq) -> Result<(), SinkError> {
        (**self).start_launch(rq)
    }
    fn finish_launch(&mut self, rq: FinishLaunchRq) -> Result<(), SinkError> {
        (**self).finish_launch(rq)
    }
    fn start_item(&mut self, parent: Option<ItemId>, rq: StartItemRq) -> Result<ItemId, SinkError> {
        (**self).start_item(parent, rq)
    }
    fn finish_item(&mut self, item: ItemId, rq: FinishItemRq) -> Result<(), SinkError> {
        (**self).finish_item(item, rq)
    }
    fn log(&mut self, item: Option<ItemId>, rq: LogRq) -> Result<(), SinkError> {
        (**self).log(item, rq)
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn start_launch(&mut self, rq: StartLaunchRq) -> Result<(), SinkError> {
        (**self).start_launch(rq)
    }
    fn finish_launch(&mut self, rq: FinishLaunchRq) -> Result<(), SinkError> {
        (**self).finish_launch(rq)
    }
    fn start_item(&mut self, parent: Option<ItemId>, rq: StartItemRq) -> Result<ItemId, SinkError> {
        (**self).start_item(parent, rq)
    }
    fn finish_item(&mut self, item: ItemId, rq: FinishItemRq) -> Result<(), SinkError> {
        (**self).finish_item(item, rq)
    }
    fn log(&mut self, item: Option<ItemId>, rq: LogRq) -> Result<(), SinkError> {
        (**self).log(item, rq)
    }
}
