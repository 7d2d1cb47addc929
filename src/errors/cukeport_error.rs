use cuke_adapters::AdapterError;
use cuke_core::{ReporterError, SinkError};
use cuke_domain::ParseError;
use thiserror::Error;

/// Error de nivel de workspace: agrupa los errores de cada crate.
#[derive(Debug, Error)]
pub enum CukeportError {
    #[error("Error de parseo: {0}")]
    Parse(#[from] ParseError),
    #[error("Error del reporter: {0}")]
    Reporter(#[from] ReporterError),
    #[error("Error de adaptador: {0}")]
    Adapter(#[from] AdapterError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SinkError> for CukeportError {
    fn from(e: SinkError) -> Self {
        Self::Reporter(ReporterError::Sink(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variant_format() {
        let err: CukeportError = ParseError::UnsupportedRule { line: 4 }.into();
        assert!(err.to_string().starts_with("Error de parseo: line 4"));
    }

    #[test]
    fn test_io_variant_from() {
        let err: CukeportError = std::io::Error::other("falló IO").into();
        assert_eq!(err.to_string(), "Error en IO: falló IO");
    }

    #[test]
    fn test_sink_error_goes_through_reporter() {
        let err: CukeportError = SinkError::LaunchNotStarted.into();
        assert!(matches!(err, CukeportError::Reporter(ReporterError::Sink(SinkError::LaunchNotStarted))));
        assert_eq!(err.to_string(), "Error del reporter: launch not started");
    }
}
