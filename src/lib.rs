//! Cukeport Rust Library
//!
//! Fachada del workspace:
//! - Re-exporta `cuke_domain` (índice estructural), `cuke_core` (reporter)
//!   y `cuke_adapters` (sinks, configuración y replay).
//! - Expone `errors` con el error agregado del workspace.
//!
//! Puede usarse desde otros binarios o directamente desde un runner.

pub mod errors;

use std::io::BufRead;

pub use cuke_adapters;
pub use cuke_core;
pub use cuke_domain;

pub use cuke_adapters::{ReporterConfig, SinkKind};
pub use cuke_core::{LifecycleEvent, ReportSink, Reporter, SharedReporter};
pub use errors::CukeportError;

/// Reproduce un stream JSON lines sobre `sink` con la configuración dada y
/// devuelve el sink para inspeccionarlo o cerrarlo.
pub fn replay_stream<R, S>(reader: R, sink: S, config: &ReporterConfig) -> Result<S, CukeportError>
    where R: BufRead,
          S: ReportSink
{
    let mut reporter = config.reporter(sink);
    cuke_adapters::replay(reader, &mut reporter)?;
    Ok(reporter.into_sink())
}

/// Parsea un documento y devuelve el nombre visible de su feature, si lo
/// tiene (`"Feature: Login"`).
pub fn feature_title(source: &str) -> Result<Option<String>, CukeportError> {
    let doc = cuke_domain::parse(source)?;
    Ok(doc.feature
          .map(|f| cuke_core::build_name(Some(f.keyword.as_str()), cuke_core::constants::COLON_INFIX, &f.name, None)))
}
