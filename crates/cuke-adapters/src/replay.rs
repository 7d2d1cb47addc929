//! Reproducción de un stream de eventos grabado en JSON lines.
//!
//! Formato: un `LifecycleEvent` por línea, con el discriminante en `type`
//! (`{"type":"test_run_started"}`). Las líneas vacías se ignoran.
use std::io::{BufRead, Write};

use cuke_core::{LifecycleEvent, ReportMode, ReportSink, Reporter};
use log::{debug, info};

use crate::error::AdapterError;

/// Decodifica una línea. `line` es 1-based y sólo se usa para el error.
pub fn parse_event(line: usize, text: &str) -> Result<LifecycleEvent, AdapterError> {
    serde_json::from_str(text).map_err(|e| AdapterError::InvalidEvent { line,
                                                                        message: e.to_string() })
}

/// Lee todos los eventos de `reader`.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<LifecycleEvent>, AdapterError> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        events.push(parse_event(idx + 1, &line)?);
    }
    Ok(events)
}

/// Escribe `events` en el formato que entiende `read_events`.
pub fn write_events<W: Write>(mut out: W, events: &[LifecycleEvent]) -> Result<(), AdapterError> {
    for event in events {
        let line = serde_json::to_string(event).map_err(|e| AdapterError::Io(e.to_string()))?;
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

/// Pasa cada evento de `reader` por `reporter`, en orden, y devuelve cuántos
/// se procesaron. Se detiene en el primer error.
pub fn replay<R, S, M>(reader: R, reporter: &mut Reporter<S, M>) -> Result<usize, AdapterError>
    where R: BufRead,
          S: ReportSink,
          M: ReportMode
{
    let mut count = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = parse_event(idx + 1, &line)?;
        debug!("replay:event line={} kind={:?}", idx + 1, event.kind());
        reporter.handle(&event)?;
        count += 1;
    }
    info!("replay:done events={count}");
    Ok(count)
}
