//! Reporter compartido entre hilos.
//!
//! El runner puede publicar eventos desde varios workers; el reporter
//! necesita verlos en secuencia. `SharedReporter` serializa la entrega con
//! un `Mutex` y se suscribe a un `EventBus` con un handler por tipo de
//! evento.
use std::sync::{Arc, Mutex, MutexGuard};

use log::error;

use crate::errors::ReporterError;
use crate::event::{EventBus, EventKind, LifecycleEvent};
use crate::mode::{ReportMode, StepReporter};
use crate::reporter::Reporter;
use crate::sink::ReportSink;

#[derive(Debug)]
pub struct SharedReporter<S, M = StepReporter>
    where S: ReportSink,
          M: ReportMode
{
    inner: Arc<Mutex<Reporter<S, M>>>,
}

impl<S, M> Clone for SharedReporter<S, M>
    where S: ReportSink,
          M: ReportMode
{
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S, M> SharedReporter<S, M>
    where S: ReportSink,
          M: ReportMode
{
    pub fn new(reporter: Reporter<S, M>) -> Self {
        Self { inner: Arc::new(Mutex::new(reporter)) }
    }

    /// Bloquea el reporter. Un lock envenenado (un hilo hizo panic con el
    /// reporter tomado) se reporta como `LockPoisoned`.
    pub fn lock(&self) -> Result<MutexGuard<'_, Reporter<S, M>>, ReporterError> {
        self.inner.lock().map_err(|_| {
                             error!("shared:lock poisoned");
                             ReporterError::LockPoisoned
                         })
    }

    pub fn handle(&self, event: &LifecycleEvent) -> Result<(), ReporterError> {
        self.lock()?.handle(event)
    }

    /// Recupera el reporter si este es el último handle vivo.
    pub fn into_inner(self) -> Result<Reporter<S, M>, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex.into_inner().map_err(|poisoned| Self::new(poisoned.into_inner())),
            Err(inner) => Err(Self { inner }),
        }
    }
}

impl<S, M> SharedReporter<S, M>
    where S: ReportSink + Send + 'static,
          M: ReportMode + Send + 'static
{
    /// Registra un handler por cada `EventKind` en `bus`.
    pub fn subscribe(&self, bus: &mut EventBus) {
        for kind in EventKind::ALL {
            let this = self.clone();
            bus.register(kind, Box::new(move |event: &LifecycleEvent| this.handle(event)));
        }
    }
}
