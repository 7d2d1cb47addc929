// feature.rs
//! Árbol estructural de un documento Gherkin.
//!
//! Es la vista estática contra la que se correlacionan los eventos dinámicos
//! del runner: cada `TestCase` ejecutado se resuelve a un `Scenario` de este
//! árbol por línea + nombre, o por la línea de una fila de `Examples` cuando
//! se trata de una iteración de un outline.
use serde::{Deserialize, Serialize};

use crate::step::{Step, TableRow};

/// Keywords que declaran un scenario plantilla (outline).
pub const OUTLINE_KEYWORDS: [&str; 2] = ["Scenario Outline", "Scenario Template"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub line: usize,
    pub name: String,
}

/// Documento parseado. `feature` es `None` para un fichero vacío o sólo con
/// comentarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GherkinDocument {
    pub feature: Option<Feature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub line: usize,
    pub keyword: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<Tag>,
    pub children: Vec<FeatureChild>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureChild {
    Background(Background),
    Scenario(Scenario),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    pub line: usize,
    pub keyword: String,
    pub name: String,
    pub steps: Vec<Step>,
}

/// Scenario concreto o plantilla. Un outline se distingue por su keyword o
/// por tener bloques `Examples`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub line: usize,
    pub keyword: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<Tag>,
    pub steps: Vec<Step>,
    pub examples: Vec<Examples>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Examples {
    pub line: usize,
    pub keyword: String,
    pub name: String,
    pub tags: Vec<Tag>,
    pub header: Option<TableRow>,
    pub body: Vec<TableRow>,
}

impl Feature {
    /// Background del documento. Sólo se reconoce como primer hijo.
    pub fn background(&self) -> Option<&Background> {
        match self.children.first() {
            Some(FeatureChild::Background(bg)) => Some(bg),
            _ => None,
        }
    }

    /// Scenarios (concretos y plantillas) en orden de declaración.
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.children.iter().filter_map(|c| match c {
                                  FeatureChild::Scenario(s) => Some(s),
                                  FeatureChild::Background(_) => None,
                              })
    }

    /// Resuelve el scenario ejecutado en `line` con nombre `name`.
    ///
    /// Primero busca coincidencia directa de línea y nombre; si el scenario es
    /// un outline, también acepta que `line` sea la línea de una de sus filas
    /// de ejemplo (el runner reporta cada iteración con la línea de la fila).
    /// Nunca devuelve un Background.
    pub fn resolve_scenario(&self, line: usize, name: &str) -> Option<&Scenario> {
        self.scenarios()
            .find(|s| (s.line == line && s.name == name) || s.example_row(line).is_some())
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }
}

impl Scenario {
    pub fn is_outline(&self) -> bool {
        !self.examples.is_empty() || OUTLINE_KEYWORDS.contains(&self.keyword.as_str())
    }

    /// Fila de ejemplo declarada en `line`, si existe.
    pub fn example_row(&self, line: usize) -> Option<&TableRow> {
        self.examples.iter().flat_map(|e| e.body.iter()).find(|row| row.line == line)
    }

    /// Número total de filas de ejemplo, sumando todos los bloques.
    pub fn example_row_count(&self) -> usize {
        self.examples.iter().map(|e| e.body.len()).sum()
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }
}
