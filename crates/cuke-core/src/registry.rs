//! Estado compartido de un run: textos fuente, árboles parseados y colas de
//! iteración de outlines.
//!
//! Se inyecta en el `Reporter` (normalmente detrás de un `Arc`) y vive lo
//! que vive el run. Es seguro bajo acceso concurrente: cada fuente se
//! parsea como mucho una vez y las colas de outline se modifican bajo el
//! lock de su propia entrada.
use std::collections::VecDeque;
use std::sync::Arc;

use cuke_domain::{parse, Feature};
use dashmap::DashMap;
use log::{debug, warn};
use once_cell::sync::OnceCell;

use crate::errors::ReporterError;

/// Clave de la cola de iteraciones: documento + línea de declaración.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutlineKey {
    pub uri: String,
    pub line: usize,
}

impl OutlineKey {
    pub fn new(uri: impl Into<String>, line: usize) -> Self {
        Self { uri: uri.into(), line }
    }
}

#[derive(Debug)]
struct SourceEntry {
    source: String,
    feature: OnceCell<Option<Arc<Feature>>>,
}

#[derive(Debug, Default)]
pub struct RunRegistry {
    sources: DashMap<String, Arc<SourceEntry>>,
    outlines: DashMap<OutlineKey, VecDeque<String>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guarda el texto fuente de `uri`. Una segunda lectura del mismo `uri`
    /// reemplaza a la anterior y descarta su árbol parseado.
    pub fn add_source(&self, uri: impl Into<String>, source: impl Into<String>) {
        let uri = uri.into();
        let source = source.into();
        debug!("registry:source_read uri={uri} bytes={}", source.len());
        self.sources.insert(uri,
                            Arc::new(SourceEntry { source,
                                                   feature: OnceCell::new() }));
    }

    pub fn has_source(&self, uri: &str) -> bool {
        self.sources.contains_key(uri)
    }

    /// Árbol del feature de `uri`, parseado en el primer acceso.
    ///
    /// `Ok(None)` significa "sin estructura": documento vacío o con errores
    /// de sintaxis (estos últimos se registran con `warn!` y no abortan).
    pub fn feature(&self, uri: &str) -> Result<Option<Arc<Feature>>, ReporterError> {
        // Se clona el Arc para no retener el lock del shard durante el parse
        let entry = self.sources
                        .get(uri)
                        .map(|e| Arc::clone(e.value()))
                        .ok_or_else(|| ReporterError::MissingSource { uri: uri.to_string() })?;
        let feature = entry.feature.get_or_init(|| match parse(&entry.source) {
                                       Ok(doc) => doc.feature.map(Arc::new),
                                       Err(e) => {
                                           warn!("registry:parse_failed uri={uri} err={e}");
                                           None
                                       }
                                   });
        Ok(feature.clone())
    }

    /// Siguiente sufijo (`" [k]"`) del outline `key`.
    ///
    /// La cola se (re)llena con `" [1]" .. " [rows]"` cuando no existe o se
    /// agotó. Devuelve `None` si el outline no tiene filas.
    pub fn next_outline_iteration(&self, key: &OutlineKey, rows: usize) -> Option<String> {
        if rows == 0 {
            return None;
        }
        let mut queue = self.outlines.entry(key.clone()).or_default();
        if queue.is_empty() {
            debug!("registry:outline_populate uri={} line={} rows={rows}", key.uri, key.line);
            queue.extend((1..=rows).map(|i| format!(" [{i}]")));
        }
        queue.pop_front()
    }

    /// Sufijos aún pendientes para `key`.
    pub fn remaining_iterations(&self, key: &OutlineKey) -> usize {
        self.outlines.get(key).map(|q| q.len()).unwrap_or(0)
    }

    /// Descarta todas las colas de outline; se llama al empezar un run.
    pub fn reset_outline_iterations(&self) {
        self.outlines.clear();
    }
}
