// scenario.rs
use std::collections::{HashMap, VecDeque};

use cuke_domain::{Scenario, Step};
use log::error;

use crate::constants::COLON_INFIX;
use crate::errors::ReporterError;
use crate::event::{PickleStep, TestCase};
use crate::naming::build_name;
use crate::registry::{OutlineKey, RunRegistry};
use crate::sink::{ItemId, TagSet};

use super::FeatureContext;

/// Scenario en curso, resuelto contra el árbol del feature abierto.
///
/// Guarda una copia del nodo resuelto y un índice `línea -> Step` que
/// incluye los steps del Background, de modo que cualquier step que el
/// runner ejecute para este test case se pueda mapear a su keyword.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    uri: String,
    test_case_line: usize,
    scenario: Scenario,
    steps: HashMap<usize, Step>,
    background_keyword: Option<String>,
    background_steps: VecDeque<usize>,
    tags: TagSet,
    outline_iteration: Option<String>,
    item: Option<ItemId>,
}

impl ScenarioContext {
    /// Resuelve `test_case` en el feature abierto y prepara el contexto.
    ///
    /// Si el nodo es un outline consume el sufijo de iteración que le toca
    /// de la cola del registry (rellenándola si no existe o está agotada).
    pub fn open(feature: &FeatureContext, test_case: &TestCase, registry: &RunRegistry) -> Result<Self, ReporterError> {
        let not_resolved = || {
            let err = ReporterError::ScenarioNotResolved { uri: test_case.uri.clone(),
                                                           line: test_case.line,
                                                           name: test_case.name.clone() };
            error!("scenario:open failed err={err}");
            err
        };
        let tree = feature.feature().ok_or_else(not_resolved)?;
        let scenario = tree.resolve_scenario(test_case.line, &test_case.name)
                           .ok_or_else(not_resolved)?
                           .clone();

        let mut steps: HashMap<usize, Step> = scenario.steps.iter().map(|s| (s.line, s.clone())).collect();
        let mut background_steps = VecDeque::new();
        let background_keyword = feature.background().map(|bg| {
                                                         for s in &bg.steps {
                                                             steps.insert(s.line, s.clone());
                                                             background_steps.push_back(s.line);
                                                         }
                                                         bg.keyword.clone()
                                                     });

        let outline_iteration = if scenario.is_outline() {
            registry.next_outline_iteration(&OutlineKey::new(feature.uri(), scenario.line),
                                            scenario.example_row_count())
        } else {
            None
        };

        Ok(Self { uri: test_case.uri.clone(),
                  test_case_line: test_case.line,
                  scenario,
                  steps,
                  background_keyword,
                  background_steps,
                  tags: test_case.tags.iter().cloned().collect(),
                  outline_iteration,
                  item: None })
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// `keyword + ": " + name + sufijo de iteración`.
    pub fn display_name(&self) -> String {
        build_name(Some(self.scenario.keyword.as_str()),
                   COLON_INFIX,
                   &self.scenario.name,
                   self.outline_iteration.as_deref())
    }

    /// Línea reportada: la de la fila de ejemplo para outlines, la del
    /// scenario en otro caso.
    pub fn line(&self) -> usize {
        if self.scenario.is_outline() {
            self.test_case_line
        } else {
            self.scenario.line
        }
    }

    /// `uri:línea`.
    pub fn description(&self) -> String {
        format!("{}:{}", self.uri, self.line())
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn outline_iteration(&self) -> Option<&str> {
        self.outline_iteration.as_deref()
    }

    /// Step del documento declarado en la línea del step del pickle.
    pub fn resolve_step(&self, step: &PickleStep) -> Result<&Step, ReporterError> {
        self.steps.get(&step.line).ok_or_else(|| {
                                       let err = ReporterError::UnknownStepLine { scenario: self.scenario.name.clone(),
                                                                                  line: step.line };
                                       error!("scenario:step failed err={err}");
                                       err
                                   })
    }

    /// `true` mientras queden steps del Background por ejecutar.
    pub fn with_background(&self) -> bool {
        !self.background_steps.is_empty()
    }

    /// Consume una entrada de la cola del Background.
    pub fn next_background_step(&mut self) -> Option<usize> {
        self.background_steps.pop_front()
    }

    /// `"BACKGROUND: "` mientras queden steps del Background, `""` después.
    pub fn step_prefix(&self) -> String {
        match &self.background_keyword {
            Some(keyword) if self.with_background() => format!("{}{COLON_INFIX}", keyword.to_uppercase()),
            _ => String::new(),
        }
    }

    pub fn item(&self) -> Option<ItemId> {
        self.item
    }

    /// Fija el item del scenario. Sólo puede hacerse una vez.
    pub fn set_item(&mut self, item: ItemId) -> Result<(), ReporterError> {
        if self.item.is_some() {
            let err = ReporterError::ScenarioItemAlreadySet { name: self.scenario.name.clone() };
            error!("scenario:set_item failed err={err}");
            return Err(err);
        }
        self.item = Some(item);
        Ok(())
    }
}
