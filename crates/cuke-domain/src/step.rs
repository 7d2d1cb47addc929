// step.rs
use serde::{Deserialize, Serialize};

/// Fila de una tabla Gherkin (data table de un step o fila de Examples).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self { line, cells }
    }
}

/// Doc string adjunto a un step (bloque entre `"""` o ```` ``` ````).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocString {
    pub line: usize,
    pub delimiter: String,
    pub media_type: Option<String>,
    pub content: String,
}

/// Argumento multilínea de un step. Un step lleva como mucho uno.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepArgument {
    DataTable(Vec<TableRow>),
    DocString(DocString),
}

impl StepArgument {
    /// Celdas de la tabla, si el argumento es una tabla.
    pub fn cells(&self) -> Option<Vec<Vec<String>>> {
        match self {
            StepArgument::DataTable(rows) => Some(rows.iter().map(|r| r.cells.clone()).collect()),
            StepArgument::DocString(_) => None,
        }
    }
}

/// Step tal como aparece en el documento fuente.
///
/// `keyword` conserva el espacio final (`"Given "`), igual que el AST de
/// Gherkin, para que `keyword + text` reproduzca la línea original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub line: usize,
    pub keyword: String,
    pub text: String,
    pub argument: Option<StepArgument>,
}

impl Step {
    pub fn new(line: usize, keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self { line,
               keyword: keyword.into(),
               text: text.into(),
               argument: None }
    }
}
