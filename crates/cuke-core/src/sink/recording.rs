use std::collections::HashMap;

use super::{FinishItemRq, FinishLaunchRq, ItemId, ItemType, LogRq, ReportSink, StartItemRq, StartLaunchRq};
use crate::errors::SinkError;

/// Llamada registrada por `RecordingSink`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    StartLaunch(StartLaunchRq),
    FinishLaunch(FinishLaunchRq),
    StartItem {
        id: ItemId,
        parent: Option<ItemId>,
        rq: StartItemRq,
    },
    FinishItem { id: ItemId, rq: FinishItemRq },
    Log { item: Option<ItemId>, rq: LogRq },
}

/// Sink en memoria que guarda cada llamada en orden.
///
/// Valida lo mínimo que validaría un backend real: no se abren items antes
/// del launch y no se cierra dos veces el mismo item.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<SinkCall>,
    open: HashMap<ItemId, ItemType>,
    types: HashMap<ItemId, ItemType>,
    launched: bool,
    fail_next: Option<SinkError>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hace fallar la próxima llamada con `err`.
    pub fn fail_next(&mut self, err: SinkError) {
        self.fail_next = Some(err);
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Items aún abiertos.
    pub fn open_items(&self) -> usize {
        self.open.len()
    }

    /// Peticiones de apertura de items del tipo dado, en orden.
    pub fn started(&self, item_type: ItemType) -> Vec<&StartItemRq> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::StartItem { rq, .. } if rq.item_type == item_type => Some(rq),
                _ => None,
            })
            .collect()
    }

    /// Id y padre del primer item abierto con `name`.
    pub fn item_named(&self, name: &str) -> Option<(ItemId, Option<ItemId>)> {
        self.calls.iter().find_map(|c| match c {
                              SinkCall::StartItem { id, parent, rq } if rq.name == name => Some((*id, *parent)),
                              _ => None,
                          })
    }

    /// Logs registrados, con el item al que se asociaron.
    pub fn logs(&self) -> Vec<(Option<ItemId>, &LogRq)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Log { item, rq } => Some((*item, rq)),
                _ => None,
            })
            .collect()
    }

    /// Secuencia compacta de llamadas, p. ej. `startItem(STEP)` o
    /// `finishItem(STEP, PASSED)`. Pensada para comparar en tests.
    pub fn summary(&self) -> Vec<String> {
        self.calls
            .iter()
            .map(|c| match c {
                SinkCall::StartLaunch(_) => "startLaunch".to_string(),
                SinkCall::FinishLaunch(_) => "finishLaunch".to_string(),
                SinkCall::StartItem { rq, .. } => format!("startItem({})", rq.item_type),
                SinkCall::FinishItem { id, rq } => {
                    let ty = self.types.get(id).map(ItemType::as_str).unwrap_or("?");
                    match rq.status {
                        Some(status) => format!("finishItem({ty}, {status})"),
                        None => format!("finishItem({ty})"),
                    }
                }
                SinkCall::Log { rq, .. } => format!("log({})", rq.level),
            })
            .collect()
    }

    fn check(&mut self) -> Result<(), SinkError> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ReportSink for RecordingSink {
    fn start_launch(&mut self, rq: StartLaunchRq) -> Result<(), SinkError> {
        self.check()?;
        self.launched = true;
        self.calls.push(SinkCall::StartLaunch(rq));
        Ok(())
    }

    fn finish_launch(&mut self, rq: FinishLaunchRq) -> Result<(), SinkError> {
        self.check()?;
        if !self.launched {
            return Err(SinkError::LaunchNotStarted);
        }
        self.launched = false;
        self.calls.push(SinkCall::FinishLaunch(rq));
        Ok(())
    }

    fn start_item(&mut self, parent: Option<ItemId>, rq: StartItemRq) -> Result<ItemId, SinkError> {
        self.check()?;
        if !self.launched {
            return Err(SinkError::LaunchNotStarted);
        }
        if let Some(p) = parent {
            if !self.open.contains_key(&p) {
                return Err(SinkError::UnknownItem(p));
            }
        }
        let id = ItemId::new();
        self.open.insert(id, rq.item_type);
        self.types.insert(id, rq.item_type);
        self.calls.push(SinkCall::StartItem { id, parent, rq });
        Ok(id)
    }

    fn finish_item(&mut self, item: ItemId, rq: FinishItemRq) -> Result<(), SinkError> {
        self.check()?;
        if self.open.remove(&item).is_none() {
            return Err(SinkError::UnknownItem(item));
        }
        self.calls.push(SinkCall::FinishItem { id: item, rq });
        Ok(())
    }

    fn log(&mut self, item: Option<ItemId>, rq: LogRq) -> Result<(), SinkError> {
        self.check()?;
        self.calls.push(SinkCall::Log { item, rq });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Status;
    use crate::sink::{LaunchSettings, LogLevel};

    #[test]
    fn test_records_in_order_and_rejects_double_finish() {
        let mut sink = RecordingSink::new();
        sink.start_launch(StartLaunchRq::from_settings(&LaunchSettings::default())).unwrap();
        let suite = sink.start_item(None, StartItemRq::new(ItemType::Suite, "Feature: f")).unwrap();
        sink.log(Some(suite), LogRq::new(LogLevel::Info, "hello")).unwrap();
        sink.finish_item(suite, FinishItemRq::without_status()).unwrap();
        assert_eq!(sink.finish_item(suite, FinishItemRq::with_status(Status::Passed)),
                   Err(SinkError::UnknownItem(suite)));
        sink.finish_launch(FinishLaunchRq::now()).unwrap();
        assert_eq!(sink.summary(),
                   vec!["startLaunch", "startItem(SUITE)", "log(INFO)", "finishItem(SUITE)", "finishLaunch"]);
        assert_eq!(sink.open_items(), 0);
    }

    #[test]
    fn test_item_requires_launch_and_known_parent() {
        let mut sink = RecordingSink::new();
        assert_eq!(sink.start_item(None, StartItemRq::new(ItemType::Suite, "x")).unwrap_err(),
                   SinkError::LaunchNotStarted);
        sink.start_launch(StartLaunchRq::from_settings(&LaunchSettings::default())).unwrap();
        let ghost = ItemId::new();
        assert_eq!(sink.start_item(Some(ghost), StartItemRq::new(ItemType::Step, "x")).unwrap_err(),
                   SinkError::UnknownItem(ghost));
    }

    #[test]
    fn test_fail_next_is_consumed_once() {
        let mut sink = RecordingSink::new();
        sink.fail_next(SinkError::Rejected("down".into()));
        assert!(sink.start_launch(StartLaunchRq::from_settings(&LaunchSettings::default())).is_err());
        assert!(sink.start_launch(StartLaunchRq::from_settings(&LaunchSettings::default())).is_ok());
        assert_eq!(sink.calls().len(), 1);
    }
}
