//! Sink que vuelca el reporte al facade `log`.
//!
//! Útil en local o en CI sin backend: cada item abierto/cerrado y cada log
//! se emite como una línea `info!` con la ruta del item dentro del árbol.
use std::collections::HashMap;

use cuke_core::{FinishItemRq, FinishLaunchRq, ItemId, LogRq, ReportSink, SinkError, StartItemRq, StartLaunchRq};
use log::info;

#[derive(Debug, Default)]
pub struct LogSink {
    launch: Option<String>,
    open: HashMap<ItemId, String>,
    depth: HashMap<ItemId, usize>,
    finished: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items cerrados desde el inicio del launch.
    pub fn finished_items(&self) -> usize {
        self.finished
    }

    fn indent(&self, item: Option<ItemId>) -> String {
        let depth = item.and_then(|id| self.depth.get(&id).copied()).unwrap_or(0);
        "  ".repeat(depth)
    }
}

impl ReportSink for LogSink {
    fn start_launch(&mut self, rq: StartLaunchRq) -> Result<(), SinkError> {
        info!("launch started: {} mode={} tags={:?}", rq.name, rq.mode.as_str(), rq.tags);
        self.launch = Some(rq.name);
        self.finished = 0;
        Ok(())
    }

    fn finish_launch(&mut self, _rq: FinishLaunchRq) -> Result<(), SinkError> {
        let name = self.launch.take().ok_or(SinkError::LaunchNotStarted)?;
        info!("launch finished: {name} ({} items)", self.finished);
        Ok(())
    }

    fn start_item(&mut self, parent: Option<ItemId>, rq: StartItemRq) -> Result<ItemId, SinkError> {
        if self.launch.is_none() {
            return Err(SinkError::LaunchNotStarted);
        }
        let depth = match parent {
            Some(p) => self.depth.get(&p).copied().ok_or(SinkError::UnknownItem(p))? + 1,
            None => 0,
        };
        let id = ItemId::new();
        info!("{}> {} {}", "  ".repeat(depth), rq.item_type, rq.name);
        self.open.insert(id, rq.name);
        self.depth.insert(id, depth);
        Ok(id)
    }

    fn finish_item(&mut self, item: ItemId, rq: FinishItemRq) -> Result<(), SinkError> {
        let name = self.open.remove(&item).ok_or(SinkError::UnknownItem(item))?;
        let status = rq.status.map(|s| s.as_str()).unwrap_or("-");
        info!("{}< {name} [{status}]", self.indent(Some(item)));
        self.depth.remove(&item);
        self.finished += 1;
        Ok(())
    }

    fn log(&mut self, item: Option<ItemId>, rq: LogRq) -> Result<(), SinkError> {
        let attachment = rq.attachment
                           .as_ref()
                           .map(|a| format!(" (+{} bytes {})", a.content.len(), a.media_type))
                           .unwrap_or_default();
        info!("{}  [{}] {}{attachment}", self.indent(item), rq.level, rq.message);
        Ok(())
    }
}
