//! Contexto abierto durante el procesamiento de eventos.
//!
//! Como mucho hay un `FeatureContext` abierto y, dentro de él, un
//! `ScenarioContext`. Ambos se construyen a partir del árbol estructural
//! cacheado en el `RunRegistry`.
mod feature;
mod scenario;

pub use feature::FeatureContext;
pub use scenario::ScenarioContext;
