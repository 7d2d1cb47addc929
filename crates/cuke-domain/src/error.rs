// error.rs
use thiserror::Error;

/// Error de parseo de un documento Gherkin.
///
/// Todas las variantes llevan la línea (base 1) donde se detectó el problema
/// para que el diagnóstico pueda señalar el punto exacto del fichero fuente.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: unexpected `{found}`")]
    UnexpectedLine { line: usize, found: String },

    #[error("line {line}: a document can only declare one Feature")]
    DuplicateFeature { line: usize },

    #[error("line {line}: `Rule` blocks are not supported")]
    UnsupportedRule { line: usize },

    #[error("line {line}: doc string is never closed")]
    UnterminatedDocString { line: usize },

    #[error("line {line}: table row has {found} cells, expected {expected}")]
    InconsistentCells { line: usize, expected: usize, found: usize },

    #[error("line {line}: malformed tag `{tag}`")]
    InvalidTag { line: usize, tag: String },
}

impl ParseError {
    /// Línea del documento en la que falló el parseo.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedLine { line, .. }
            | ParseError::DuplicateFeature { line }
            | ParseError::UnsupportedRule { line }
            | ParseError::UnterminatedDocString { line }
            | ParseError::InconsistentCells { line, .. }
            | ParseError::InvalidTag { line, .. } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_line() {
        let err = ParseError::InconsistentCells { line: 12, expected: 3, found: 2 };
        assert_eq!(err.to_string(), "line 12: table row has 2 cells, expected 3");
        assert_eq!(err.line(), 12);
    }

    #[test]
    fn test_rule_message() {
        let err = ParseError::UnsupportedRule { line: 4 };
        assert_eq!(err.to_string(), "line 4: `Rule` blocks are not supported");
    }
}
