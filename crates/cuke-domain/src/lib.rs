// cuke-domain library entry point
//! Índice estructural de documentos Gherkin: modelo inmutable del árbol
//! `Feature -> Background/Scenario -> Step` y parser de texto fuente.
pub mod error;
pub mod feature;
pub mod parser;
pub mod step;
pub use error::ParseError;
pub use feature::{Background, Examples, Feature, FeatureChild, GherkinDocument, Scenario, Tag};
pub use parser::parse;
pub use step::{DocString, Step, StepArgument, TableRow};
