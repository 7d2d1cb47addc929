//! Eventos del ciclo de vida del runner.
//!
//! Rol en el flujo:
//! - El runner publica estos eventos en orden de llegada (run -> source ->
//!   test case -> steps/hooks -> fin).
//! - El `Reporter` los consume uno a uno y los traduce a llamadas del
//!   `ReportSink`.
//! - `TestStep` es una unión cerrada: un step es un hook o un step del
//!   pickle, nunca ambos.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Momento del ciclo en el que corre un hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookType {
    Before,
    After,
    BeforeStep,
    AfterStep,
}

impl HookType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookType::Before => "BEFORE",
            HookType::After => "AFTER",
            HookType::BeforeStep => "BEFORE_STEP",
            HookType::AfterStep => "AFTER_STEP",
        }
    }

    /// `true` para hooks que corren antes de su scenario o step.
    ///
    /// `BeforeStep` también cuenta como previo: su mensaje de cierre es
    /// "Before hook: ...", nunca "After hook: ...".
    pub fn is_before(&self) -> bool {
        matches!(self, HookType::Before | HookType::BeforeStep)
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estado de un step o test case tal como lo reporta el runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Passed,
    Skipped,
    Pending,
    Undefined,
    Ambiguous,
    Failed,
    Unused,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Passed => "PASSED",
            Status::Skipped => "SKIPPED",
            Status::Pending => "PENDING",
            Status::Undefined => "UNDEFINED",
            Status::Ambiguous => "AMBIGUOUS",
            Status::Failed => "FAILED",
            Status::Unused => "UNUSED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resultado de un step, hook o test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub status: Status,
    #[serde(default)]
    pub error: Option<String>,
}

impl StepResult {
    pub fn passed() -> Self {
        Self { status: Status::Passed,
               error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { status: Status::Failed,
               error: Some(error.into()) }
    }

    pub fn with_status(status: Status) -> Self {
        Self { status, error: None }
    }
}

/// Representación resuelta (pickle) de un scenario a ejecutar.
///
/// `line` es la línea del scenario o, para una iteración de un outline, la
/// línea de la fila de ejemplo. `tags` ya incluye los heredados del feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub uri: String,
    pub line: usize,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TestCase {
    pub fn new(uri: impl Into<String>, line: usize, name: impl Into<String>) -> Self {
        Self { uri: uri.into(),
               line,
               name: name.into(),
               tags: Vec::new() }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
        where I: IntoIterator<Item = T>,
              T: Into<String>
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Argumento multilínea de un step del pickle (ya con parámetros sustituidos).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickleArgument {
    DataTable { rows: Vec<Vec<String>> },
    DocString {
        content: String,
        #[serde(default)]
        media_type: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickleStep {
    pub line: usize,
    pub text: String,
    #[serde(default)]
    pub argument: Option<PickleArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookTestStep {
    pub hook_type: HookType,
    pub code_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickleStepTestStep {
    pub step: PickleStep,
    #[serde(default)]
    pub code_location: Option<String>,
}

/// Step ejecutado por el runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStep {
    Hook(HookTestStep),
    Pickle(PickleStepTestStep),
}

impl TestStep {
    pub fn hook(hook_type: HookType, code_location: impl Into<String>) -> Self {
        TestStep::Hook(HookTestStep { hook_type,
                                      code_location: code_location.into() })
    }

    pub fn pickle(line: usize, text: impl Into<String>) -> Self {
        TestStep::Pickle(PickleStepTestStep { step: PickleStep { line,
                                                                 text: text.into(),
                                                                 argument: None },
                                              code_location: None })
    }

    /// Igual que `pickle` pero con argumento multilínea.
    pub fn pickle_with(line: usize, text: impl Into<String>, argument: PickleArgument) -> Self {
        TestStep::Pickle(PickleStepTestStep { step: PickleStep { line,
                                                                 text: text.into(),
                                                                 argument: Some(argument) },
                                              code_location: None })
    }

    pub fn is_hook(&self) -> bool {
        matches!(self, TestStep::Hook(_))
    }
}

/// Eventos soportados. El contrato es el orden de llegada: `TestRunStarted`
/// primero y `TestRunFinished` al final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    TestRunStarted,
    /// Texto fuente de un feature, entregado antes de cualquier test case de
    /// ese `uri`.
    TestSourceRead { uri: String, source: String },
    TestCaseStarted { test_case: TestCase },
    TestStepStarted { test_case: TestCase, test_step: TestStep },
    TestStepFinished {
        test_case: TestCase,
        test_step: TestStep,
        result: StepResult,
    },
    TestCaseFinished { test_case: TestCase, result: StepResult },
    TestRunFinished,
    /// Adjunto generado desde un hook o step (`scenario.embed`).
    Embed { media_type: String, data: Vec<u8> },
    /// Texto libre generado desde un hook o step (`scenario.write`).
    Write { text: String },
}

/// Discriminante de `LifecycleEvent`, usado para registrar handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    TestRunStarted,
    TestSourceRead,
    TestCaseStarted,
    TestStepStarted,
    TestStepFinished,
    TestCaseFinished,
    TestRunFinished,
    Embed,
    Write,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [EventKind::TestRunStarted,
                                     EventKind::TestSourceRead,
                                     EventKind::TestCaseStarted,
                                     EventKind::TestStepStarted,
                                     EventKind::TestStepFinished,
                                     EventKind::TestCaseFinished,
                                     EventKind::TestRunFinished,
                                     EventKind::Embed,
                                     EventKind::Write];
}

impl LifecycleEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LifecycleEvent::TestRunStarted => EventKind::TestRunStarted,
            LifecycleEvent::TestSourceRead { .. } => EventKind::TestSourceRead,
            LifecycleEvent::TestCaseStarted { .. } => EventKind::TestCaseStarted,
            LifecycleEvent::TestStepStarted { .. } => EventKind::TestStepStarted,
            LifecycleEvent::TestStepFinished { .. } => EventKind::TestStepFinished,
            LifecycleEvent::TestCaseFinished { .. } => EventKind::TestCaseFinished,
            LifecycleEvent::TestRunFinished => EventKind::TestRunFinished,
            LifecycleEvent::Embed { .. } => EventKind::Embed,
            LifecycleEvent::Write { .. } => EventKind::Write,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_before_step_hooks_count_as_before() {
        assert!(HookType::Before.is_before());
        assert!(HookType::BeforeStep.is_before());
        assert!(!HookType::After.is_before());
        assert!(!HookType::AfterStep.is_before());
    }
}
