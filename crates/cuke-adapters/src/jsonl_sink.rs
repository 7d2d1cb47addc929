//! Sink que serializa cada llamada como una línea JSON.
//!
//! Cada línea es un `SinkRecord` con el discriminante en `op`. Los ids se
//! generan aquí (uuid v4) y se escriben en el registro de apertura, de modo
//! que el fichero basta para reconstruir el árbol.
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cuke_core::{FinishItemRq, FinishLaunchRq, ItemId, LogRq, ReportSink, SinkError, StartItemRq, StartLaunchRq};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SinkRecord {
    StartLaunch { rq: StartLaunchRq },
    FinishLaunch { rq: FinishLaunchRq },
    StartItem {
        id: ItemId,
        parent: Option<ItemId>,
        rq: StartItemRq,
    },
    FinishItem { id: ItemId, rq: FinishItemRq },
    Log { item: Option<ItemId>, rq: LogRq },
}

#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    out: W,
    open: HashSet<ItemId>,
    written: usize,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Crea (o trunca) el fichero en `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, AdapterError> {
        let file = File::create(path.as_ref())?;
        debug!("jsonl_sink:create path={}", path.as_ref().display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out,
               open: HashSet::new(),
               written: 0 }
    }

    /// Registros escritos hasta ahora.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, record: &SinkRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    fn start_launch(&mut self, rq: StartLaunchRq) -> Result<(), SinkError> {
        self.write(&SinkRecord::StartLaunch { rq })
    }

    fn finish_launch(&mut self, rq: FinishLaunchRq) -> Result<(), SinkError> {
        self.write(&SinkRecord::FinishLaunch { rq })?;
        self.out.flush()?;
        Ok(())
    }

    fn start_item(&mut self, parent: Option<ItemId>, rq: StartItemRq) -> Result<ItemId, SinkError> {
        if let Some(p) = parent {
            if !self.open.contains(&p) {
                return Err(SinkError::UnknownItem(p));
            }
        }
        let id = ItemId::new();
        self.write(&SinkRecord::StartItem { id, parent, rq })?;
        self.open.insert(id);
        Ok(id)
    }

    fn finish_item(&mut self, item: ItemId, rq: FinishItemRq) -> Result<(), SinkError> {
        if !self.open.remove(&item) {
            return Err(SinkError::UnknownItem(item));
        }
        self.write(&SinkRecord::FinishItem { id: item, rq })
    }

    fn log(&mut self, item: Option<ItemId>, rq: LogRq) -> Result<(), SinkError> {
        self.write(&SinkRecord::Log { item, rq })
    }
}

/// Lee de vuelta los registros escritos por `JsonLinesSink`.
pub fn read_records(text: &str) -> Result<Vec<SinkRecord>, AdapterError> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            serde_json::from_str(l).map_err(|e| AdapterError::InvalidEvent { line: i + 1,
                                                                              message: e.to_string() })
        })
        .collect()
}
