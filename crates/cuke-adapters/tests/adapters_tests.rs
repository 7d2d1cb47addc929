use std::io::Cursor;

use cuke_adapters::{read_events, read_records, replay, write_events, AdapterError, JsonLinesSink, LogSink, ReporterConfig,
                    SinkRecord};
use cuke_core::{ItemType, LifecycleEvent, LogLevel, RecordingSink, Reporter, ReporterError, Status};

const LOGIN_STREAM: &str = include_str!("fixtures/login.jsonl");

#[test]
fn test_read_events_decodes_fixture() {
    let events = read_events(Cursor::new(LOGIN_STREAM)).expect("fixture decodes");
    assert_eq!(events.len(), 13);
    assert_eq!(events[0], LifecycleEvent::TestRunStarted);
    assert!(matches!(&events[10], LifecycleEvent::Embed { media_type, data } if media_type == "image/png" && data.len() == 4));

    // Ida y vuelta por write_events conserva el stream
    let mut buf = Vec::new();
    write_events(&mut buf, &events).unwrap();
    assert_eq!(read_events(Cursor::new(buf)).unwrap(), events);
}

#[test]
fn test_replay_into_recording_sink() {
    let mut reporter = Reporter::new(RecordingSink::new());
    let count = replay(Cursor::new(LOGIN_STREAM), &mut reporter).unwrap();
    assert_eq!(count, 13);

    let sink = reporter.sink();
    assert_eq!(sink.summary(),
               vec!["startLaunch",
                    "startItem(SUITE)",
                    "startItem(SCENARIO)",
                    "startItem(BEFORE_TEST)",
                    "log(INFO)",
                    "finishItem(BEFORE_TEST, PASSED)",
                    "startItem(STEP)",
                    "finishItem(STEP, PASSED)",
                    "log(INFO)",
                    "startItem(STEP)",
                    "log(ERROR)",
                    "finishItem(STEP, FAILED)",
                    "log(UNKNOWN)",
                    "finishItem(SCENARIO, FAILED)",
                    "finishItem(SUITE)",
                    "finishLaunch"]);
    let steps: Vec<_> = sink.started(ItemType::Step).iter().map(|rq| rq.name.clone()).collect();
    assert_eq!(steps, vec!["Given the login page", "When user logs in"]);
}

#[test]
fn test_replay_through_jsonl_sink_with_config() {
    let config = ReporterConfig::from_lookup(|key| match key {
                     "CUKEPORT_LAUNCH_NAME" => Some("nightly".to_string()),
                     "CUKEPORT_SCENARIO_TYPE" => Some("TEST".to_string()),
                     _ => None,
                 }).unwrap();
    let mut reporter = config.reporter(JsonLinesSink::new(Vec::new()));
    replay(Cursor::new(LOGIN_STREAM), &mut reporter).unwrap();
    assert_eq!(reporter.sink().written(), 16);

    let text = String::from_utf8(reporter.into_sink().into_inner()).unwrap();
    let records = read_records(&text).unwrap();
    assert!(matches!(&records[0], SinkRecord::StartLaunch { rq } if rq.name == "nightly"));

    let scenario = records.iter()
                          .find_map(|r| match r {
                              SinkRecord::StartItem { id, parent, rq } if rq.item_type == ItemType::Test => {
                                  Some((*id, *parent, rq.name.clone()))
                              }
                              _ => None,
                          })
                          .expect("scenario reported as TEST");
    assert_eq!(scenario.2, "Scenario: Login");
    assert!(scenario.1.is_some());

    let failed_log = records.iter().any(|r| {
                                        matches!(r, SinkRecord::Log { item, rq }
                                                 if rq.level == LogLevel::Error && rq.message == "timeout waiting for dashboard" && item.is_some())
                                    });
    assert!(failed_log);
    assert!(records.iter().any(|r| {
                              matches!(r, SinkRecord::FinishItem { id, rq } if *id == scenario.0 && rq.status == Some(Status::Failed))
                          }));
}

#[test]
fn test_replay_into_log_sink() {
    let mut reporter = Reporter::new(LogSink::new());
    replay(Cursor::new(LOGIN_STREAM), &mut reporter).unwrap();
    // suite + scenario + hook + 2 steps
    assert_eq!(reporter.sink().finished_items(), 5);
}

#[test]
fn test_invalid_line_reports_its_number() {
    let stream = "{\"type\":\"test_run_started\"}\n\n{\"type\":\"nope\"}\n";
    match read_events(Cursor::new(stream)) {
        Err(AdapterError::InvalidEvent { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected invalid event, got {other:?}"),
    }
}

#[test]
fn test_replay_surfaces_reporter_errors() {
    // Test case sin TestSourceRead previo
    let stream = concat!("{\"type\":\"test_run_started\"}\n",
                         "{\"type\":\"test_case_started\",\"test_case\":{\"uri\":\"a.feature\",\"line\":1,\"name\":\"x\"}}\n");
    let mut reporter = Reporter::new(RecordingSink::new());
    assert_eq!(replay(Cursor::new(stream), &mut reporter).unwrap_err(),
               AdapterError::Reporter(ReporterError::MissingSource { uri: "a.feature".into() }));
}
