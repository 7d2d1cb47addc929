//! Carga de configuración del reporter desde variables de entorno.
//! Todas las claves usan el prefijo `CUKEPORT_` y son opcionales.

use std::env;
use std::path::PathBuf;

use cuke_core::{ItemType, LaunchMode, LaunchSettings, ReportSink, Reporter, StepReporter, TagSet};
use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::AdapterError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const ENV_LAUNCH_NAME: &str = "CUKEPORT_LAUNCH_NAME";
pub const ENV_MODE: &str = "CUKEPORT_MODE";
pub const ENV_TAGS: &str = "CUKEPORT_TAGS";
pub const ENV_DESCRIPTION: &str = "CUKEPORT_DESCRIPTION";
pub const ENV_SCENARIO_TYPE: &str = "CUKEPORT_SCENARIO_TYPE";
pub const ENV_SINK: &str = "CUKEPORT_SINK";
pub const ENV_OUTPUT: &str = "CUKEPORT_OUTPUT";

/// Backend al que se envía el reporte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkKind {
    #[default]
    Log,
    JsonLines,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    pub launch: LaunchSettings,
    pub scenario_type: ItemType,
    pub sink: SinkKind,
    pub output: Option<PathBuf>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self { launch: LaunchSettings::default(),
               scenario_type: ItemType::Scenario,
               sink: SinkKind::Log,
               output: None }
    }
}

impl ReporterConfig {
    pub fn from_env() -> Result<Self, AdapterError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero leyendo las claves de `lookup`. Los
    /// valores vacíos cuentan como ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AdapterError>
        where F: Fn(&str) -> Option<String>
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(name) = get(ENV_LAUNCH_NAME) {
            cfg.launch.name = name;
        }
        if let Some(mode) = get(ENV_MODE) {
            cfg.launch.mode = match mode.to_ascii_uppercase().as_str() {
                "DEFAULT" => LaunchMode::Default,
                "DEBUG" => LaunchMode::Debug,
                _ => return Err(invalid(ENV_MODE, mode)),
            };
        }
        if let Some(tags) = get(ENV_TAGS) {
            cfg.launch.tags = tags.split(',')
                                  .map(str::trim)
                                  .filter(|t| !t.is_empty())
                                  .map(str::to_string)
                                  .collect::<TagSet>();
        }
        cfg.launch.description = get(ENV_DESCRIPTION);
        if let Some(ty) = get(ENV_SCENARIO_TYPE) {
            cfg.scenario_type = match ty.to_ascii_uppercase().as_str() {
                "SCENARIO" => ItemType::Scenario,
                "TEST" => ItemType::Test,
                _ => return Err(invalid(ENV_SCENARIO_TYPE, ty)),
            };
        }
        if let Some(sink) = get(ENV_SINK) {
            cfg.sink = match sink.to_ascii_lowercase().as_str() {
                "log" => SinkKind::Log,
                "jsonl" => SinkKind::JsonLines,
                _ => return Err(invalid(ENV_SINK, sink)),
            };
        }
        cfg.output = get(ENV_OUTPUT).map(PathBuf::from);
        if cfg.sink == SinkKind::JsonLines && cfg.output.is_none() {
            return Err(AdapterError::MissingConfig { key: ENV_OUTPUT.to_string(),
                                                     reason: format!("{ENV_SINK}=jsonl") });
        }
        Ok(cfg)
    }

    /// Estrategia de reporte según `scenario_type`.
    pub fn mode(&self) -> StepReporter {
        StepReporter::new().with_scenario_type(self.scenario_type)
    }

    /// Reporter configurado (launch + modo) sobre `sink`.
    pub fn reporter<S: ReportSink>(&self, sink: S) -> Reporter<S> {
        Reporter::builder(sink).launch(self.launch.clone()).mode(self.mode()).build()
    }
}

fn invalid(key: &str, value: String) -> AdapterError {
    AdapterError::InvalidConfig { key: key.to_string(),
                                  value }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
