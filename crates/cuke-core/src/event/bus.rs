use std::collections::HashMap;

use log::debug;

use super::{EventKind, LifecycleEvent};
use crate::errors::ReporterError;

/// Handler registrado para un tipo de evento.
pub type EventHandler = Box<dyn FnMut(&LifecycleEvent) -> Result<(), ReporterError> + Send>;

/// Tabla de publicación/suscripción síncrona.
///
/// Cada `EventKind` mapea a sus handlers en orden de registro. `publish`
/// invoca los handlers en el hilo del llamador y se detiene en el primer
/// error, que se devuelve tal cual: no hay buffering ni reintentos.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<EventHandler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: EventKind, handler: EventHandler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    pub fn publish(&mut self, event: &LifecycleEvent) -> Result<(), ReporterError> {
        let kind = event.kind();
        let Some(handlers) = self.handlers.get_mut(&kind) else {
            debug!("publish:skip kind={kind:?} (no handlers)");
            return Ok(());
        };
        for handler in handlers.iter_mut() {
            handler(event)?;
        }
        Ok(())
    }

    /// Número de handlers registrados para `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map(Vec::len).unwrap_or(0)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<_, _> = self.handlers.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}
