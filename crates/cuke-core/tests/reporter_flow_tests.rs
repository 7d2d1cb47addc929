use cuke_core::{HookType, ItemType, LifecycleEvent, LogLevel, PickleArgument, RecordingSink, Reporter, ReporterError,
                ReporterState, SinkError, Status, StepResult, TestCase, TestStep};

const AUTH_URI: &str = "features/auth.feature";
const AUTH: &str = "\
Feature: Authentication
  As a user I want to sign in.

  Scenario: Logout
    Given the user is signed in
    When the user logs out

  @smoke
  @fast
  Scenario: Login
    When user logs in
";

const CUKES_URI: &str = "features/cukes.feature";
const CUKES: &str = "\
@food
Feature: Cukes
  Background:
    Given a basket
    And a knife

  Scenario Outline: Eat <n>
    When I eat <n>

    Examples: few
      | n |
      | 1 |
      | 2 |

    Examples: many
      | n  |
      | 10 |
";

fn login_case() -> TestCase {
    TestCase::new(AUTH_URI, 10, "Login").with_tags(["@smoke", "@fast"])
}

fn step_started(tc: &TestCase, step: TestStep) -> LifecycleEvent {
    LifecycleEvent::TestStepStarted { test_case: tc.clone(),
                                      test_step: step }
}

fn step_finished(tc: &TestCase, step: TestStep, result: StepResult) -> LifecycleEvent {
    LifecycleEvent::TestStepFinished { test_case: tc.clone(),
                                       test_step: step,
                                       result }
}

fn case_started(tc: &TestCase) -> LifecycleEvent {
    LifecycleEvent::TestCaseStarted { test_case: tc.clone() }
}

fn case_finished(tc: &TestCase, status: Status) -> LifecycleEvent {
    LifecycleEvent::TestCaseFinished { test_case: tc.clone(),
                                       result: StepResult::with_status(status) }
}

fn source(uri: &str, text: &str) -> LifecycleEvent {
    LifecycleEvent::TestSourceRead { uri: uri.into(),
                                     source: text.into() }
}

fn run(reporter: &mut Reporter<RecordingSink>, events: &[LifecycleEvent]) {
    for e in events {
        reporter.handle(e).expect("event should be accepted");
    }
}

#[test]
fn test_end_to_end_sink_call_sequence() {
    let tc = login_case();
    let step = TestStep::pickle(11, "user logs in");
    let mut reporter = Reporter::new(RecordingSink::new());
    run(&mut reporter,
        &[LifecycleEvent::TestRunStarted,
          source(AUTH_URI, AUTH),
          case_started(&tc),
          step_started(&tc, step.clone()),
          step_finished(&tc, step, StepResult::passed()),
          case_finished(&tc, Status::Passed),
          LifecycleEvent::TestRunFinished]);

    let sink = reporter.sink();
    assert_eq!(sink.summary(),
               vec!["startLaunch",
                    "startItem(SUITE)",
                    "startItem(SCENARIO)",
                    "startItem(STEP)",
                    "finishItem(STEP, PASSED)",
                    "finishItem(SCENARIO, PASSED)",
                    "finishItem(SUITE)",
                    "finishLaunch"]);

    let (suite, suite_parent) = sink.item_named("Feature: Authentication").expect("suite item");
    let (scenario, scenario_parent) = sink.item_named("Scenario: Login").expect("scenario item");
    let (_, step_parent) = sink.item_named("When user logs in").expect("step item");
    assert_eq!(suite_parent, None);
    assert_eq!(scenario_parent, Some(suite));
    assert_eq!(step_parent, Some(scenario));

    let suites = sink.started(ItemType::Suite);
    assert_eq!(suites[0].description.as_deref(), Some(AUTH_URI));
    let scenarios = sink.started(ItemType::Scenario);
    assert_eq!(scenarios[0].description.as_deref(), Some("features/auth.feature:10"));
    assert_eq!(scenarios[0].tags.iter().collect::<Vec<_>>(), vec!["@smoke", "@fast"]);
    assert_eq!(sink.open_items(), 0);
    assert_eq!(reporter.state(), ReporterState::NoFeature);
}

#[test]
fn test_outline_iterations_and_background_prefix() {
    let mut reporter = Reporter::new(RecordingSink::new());
    run(&mut reporter, &[LifecycleEvent::TestRunStarted, source(CUKES_URI, CUKES)]);

    for (row, n) in [(12, "1"), (13, "2"), (17, "10")] {
        let tc = TestCase::new(CUKES_URI, row, format!("Eat {n}")).with_tags(["@food"]);
        let mut events = vec![case_started(&tc)];
        for (line, text) in [(4, "a basket".to_string()), (5, "a knife".to_string()), (8, format!("I eat {n}"))] {
            let step = TestStep::pickle(line, text);
            events.push(step_started(&tc, step.clone()));
            events.push(step_finished(&tc, step, StepResult::passed()));
        }
        events.push(case_finished(&tc, Status::Passed));
        run(&mut reporter, &events);
    }
    run(&mut reporter, &[LifecycleEvent::TestRunFinished]);

    let sink = reporter.sink();
    let scenarios: Vec<_> = sink.started(ItemType::Scenario).iter().map(|rq| rq.name.clone()).collect();
    assert_eq!(scenarios,
               vec!["Scenario Outline: Eat <n> [1]",
                    "Scenario Outline: Eat <n> [2]",
                    "Scenario Outline: Eat <n> [3]"]);
    let descriptions: Vec<_> = sink.started(ItemType::Scenario)
                                   .iter()
                                   .filter_map(|rq| rq.description.clone())
                                   .collect();
    assert_eq!(descriptions,
               vec!["features/cukes.feature:12", "features/cukes.feature:13", "features/cukes.feature:17"]);

    let steps: Vec<_> = sink.started(ItemType::Step).iter().take(3).map(|rq| rq.name.clone()).collect();
    assert_eq!(steps,
               vec!["BACKGROUND: Given a basket", "BACKGROUND: And a knife", "When I eat 1"]);
    // Un único SUITE para las tres iteraciones
    assert_eq!(sink.started(ItemType::Suite).len(), 1);
    assert_eq!(sink.started(ItemType::Suite)[0].tags.iter().collect::<Vec<_>>(), vec!["@food"]);
}

#[test]
fn test_new_run_resets_outline_iterations() {
    let mut reporter = Reporter::new(RecordingSink::new());
    let tc = TestCase::new(CUKES_URI, 12, "Eat 1");
    // Primer run: sólo se ejecuta una de las tres filas
    run(&mut reporter,
        &[LifecycleEvent::TestRunStarted,
          source(CUKES_URI, CUKES),
          case_started(&tc),
          case_finished(&tc, Status::Skipped),
          LifecycleEvent::TestRunFinished]);
    run(&mut reporter,
        &[LifecycleEvent::TestRunStarted,
          source(CUKES_URI, CUKES),
          case_started(&tc),
          case_finished(&tc, Status::Passed),
          LifecycleEvent::TestRunFinished]);

    let names: Vec<_> = reporter.sink()
                                .started(ItemType::Scenario)
                                .iter()
                                .map(|rq| rq.name.clone())
                                .collect();
    assert_eq!(names, vec!["Scenario Outline: Eat <n> [1]", "Scenario Outline: Eat <n> [1]"]);
}

#[test]
fn test_hooks_are_grouped_with_last_status() {
    let tc = login_case();
    let before = TestStep::hook(HookType::Before, "hooks.rs:12");
    let after = TestStep::hook(HookType::After, "hooks.rs:30");
    let step = TestStep::pickle(11, "user logs in");
    let mut reporter = Reporter::new(RecordingSink::new());
    run(&mut reporter,
        &[LifecycleEvent::TestRunStarted,
          source(AUTH_URI, AUTH),
          case_started(&tc),
          step_started(&tc, before.clone())]);
    assert_eq!(reporter.state(), ReporterState::HookOpen);
    run(&mut reporter,
        &[step_finished(&tc, before, StepResult::passed()),
          step_started(&tc, step.clone()),
          step_finished(&tc, step, StepResult::passed()),
          step_started(&tc, after.clone()),
          step_finished(&tc, after, StepResult::failed("screenshot failed")),
          case_finished(&tc, Status::Failed)]);
    assert_eq!(reporter.state(), ReporterState::FeatureOpen);

    let sink = reporter.sink();
    assert_eq!(sink.started(ItemType::BeforeTest)[0].name, "Before hooks");
    assert_eq!(sink.started(ItemType::AfterTest)[0].name, "After hooks");
    let summary = sink.summary();
    assert!(summary.contains(&"finishItem(BEFORE_TEST, PASSED)".to_string()));
    assert!(summary.contains(&"finishItem(AFTER_TEST, FAILED)".to_string()));

    let (after_item, after_parent) = sink.item_named("After hooks").unwrap();
    let (scenario_item, _) = sink.item_named("Scenario: Login").unwrap();
    assert_eq!(after_parent, Some(scenario_item));

    let logs: Vec<_> = sink.logs()
                           .into_iter()
                           .map(|(item, rq)| (item, rq.level, rq.message.clone()))
                           .collect();
    assert!(logs.contains(&(sink.item_named("Before hooks").map(|(id, _)| id),
                            LogLevel::Info,
                            "Before hook: hooks.rs:12".to_string())));
    assert!(logs.contains(&(Some(after_item), LogLevel::Error, "screenshot failed".to_string())));
    assert!(logs.contains(&(Some(after_item), LogLevel::Error, "After hook: hooks.rs:30".to_string())));
}

#[test]
fn test_feature_switch_closes_previous_suite() {
    let logout = TestCase::new(AUTH_URI, 4, "Logout");
    let cukes = TestCase::new(CUKES_URI, 12, "Eat 1");
    let mut reporter = Reporter::new(RecordingSink::new());
    run(&mut reporter,
        &[LifecycleEvent::TestRunStarted,
          source(AUTH_URI, AUTH),
          source(CUKES_URI, CUKES),
          case_started(&logout),
          case_finished(&logout, Status::Passed),
          case_started(&cukes),
          case_finished(&cukes, Status::Passed),
          LifecycleEvent::TestRunFinished]);

    assert_eq!(reporter.sink().summary(),
               vec!["startLaunch",
                    "startItem(SUITE)",
                    "startItem(SCENARIO)",
                    "finishItem(SCENARIO, PASSED)",
                    "finishItem(SUITE)",
                    "startItem(SUITE)",
                    "startItem(SCENARIO)",
                    "finishItem(SCENARIO, PASSED)",
                    "finishItem(SUITE)",
                    "finishLaunch"]);
}

#[test]
fn test_step_argument_becomes_description() {
    let tc = login_case();
    let step = TestStep::pickle_with(11,
                                     "user logs in",
                                     PickleArgument::DocString { content: "abc".into(),
                                                                 media_type: None });
    let mut reporter = Reporter::new(RecordingSink::new());
    run(&mut reporter,
        &[LifecycleEvent::TestRunStarted,
          source(AUTH_URI, AUTH),
          case_started(&tc),
          step_started(&tc, step)]);
    assert_eq!(reporter.sink().started(ItemType::Step)[0].description.as_deref(),
               Some("\n\"\"\"\nabc\n\"\"\"\n"));
}

#[test]
fn test_logs_attach_to_innermost_open_item() {
    let tc = login_case();
    let step = TestStep::pickle(11, "user logs in");
    let mut reporter = Reporter::new(RecordingSink::new());
    run(&mut reporter,
        &[LifecycleEvent::TestRunStarted,
          LifecycleEvent::Write { text: "launch level".into() },
          source(AUTH_URI, AUTH),
          case_started(&tc),
          LifecycleEvent::Write { text: "scenario level".into() },
          step_started(&tc, step.clone()),
          LifecycleEvent::Embed { media_type: "image/png".into(),
                                  data: vec![0x89, 0x50] },
          LifecycleEvent::Embed { media_type: "garbage".into(),
                                  data: vec![1] },
          step_finished(&tc, step, StepResult::passed()),
          case_finished(&tc, Status::Passed),
          LifecycleEvent::Write { text: "feature level".into() }]);

    let sink = reporter.sink();
    let (feature, _) = sink.item_named("Feature: Authentication").unwrap();
    let (scenario, _) = sink.item_named("Scenario: Login").unwrap();
    let (step, _) = sink.item_named("When user logs in").unwrap();
    let logs = sink.logs();
    assert_eq!(logs.len(), 5);
    assert_eq!((logs[0].0, logs[0].1.level), (None, LogLevel::Info));
    assert_eq!(logs[1].0, Some(scenario));

    assert_eq!(logs[2].0, Some(step));
    assert_eq!(logs[2].1.level, LogLevel::Unknown);
    assert_eq!(logs[2].1.message, "image");
    let attachment = logs[2].1.attachment.as_ref().expect("attachment");
    assert_eq!((attachment.media_type.as_str(), attachment.content.as_slice()), ("image/png", &[0x89u8, 0x50][..]));
    assert_eq!(logs[3].1.message, "embedding");

    assert_eq!((logs[4].0, logs[4].1.message.as_str()), (Some(feature), "feature level"));
}

#[test]
fn test_structural_mismatches_are_fatal() {
    // Sin TestSourceRead para el uri
    let mut reporter = Reporter::new(RecordingSink::new());
    reporter.handle(&LifecycleEvent::TestRunStarted).unwrap();
    assert_eq!(reporter.handle(&case_started(&login_case())).unwrap_err(),
               ReporterError::MissingSource { uri: AUTH_URI.into() });

    // Scenario que no existe en el documento
    let ghost = TestCase::new(AUTH_URI, 3, "Ghost");
    reporter.handle(&source(AUTH_URI, AUTH)).unwrap();
    assert_eq!(reporter.handle(&case_started(&ghost)).unwrap_err(),
               ReporterError::ScenarioNotResolved { uri: AUTH_URI.into(),
                                                    line: 3,
                                                    name: "Ghost".into() });

    // Step fuera de un scenario
    let step = TestStep::pickle(11, "user logs in");
    assert_eq!(reporter.handle(&step_started(&login_case(), step)).unwrap_err(),
               ReporterError::NoScenarioOpen);
    assert_eq!(reporter.handle(&case_finished(&login_case(), Status::Passed)).unwrap_err(),
               ReporterError::NoScenarioOpen);

    // Step en una línea que no pertenece al scenario
    let tc = login_case();
    reporter.handle(&case_started(&tc)).unwrap();
    assert!(matches!(reporter.handle(&step_started(&tc, TestStep::pickle(5, "the user is signed in"))),
                     Err(ReporterError::UnknownStepLine { line: 5, .. })));
}

#[test]
fn test_second_case_start_while_open_is_rejected_without_sink_calls() {
    let tc = login_case();
    let mut reporter = Reporter::new(RecordingSink::new());
    run(&mut reporter, &[LifecycleEvent::TestRunStarted, source(AUTH_URI, AUTH), case_started(&tc)]);
    let before = reporter.sink().calls().len();
    assert_eq!(reporter.handle(&case_started(&tc)).unwrap_err(),
               ReporterError::ScenarioItemAlreadySet { name: "Login".into() });
    assert_eq!(reporter.sink().calls().len(), before);
}

#[test]
fn test_unparsable_source_opens_suite_named_after_uri() {
    let tc = TestCase::new("features/broken.feature", 2, "Anything");
    let mut reporter = Reporter::new(RecordingSink::new());
    run(&mut reporter,
        &[LifecycleEvent::TestRunStarted,
          source("features/broken.feature", "Feature: broken\n  Rule: nope\n")]);
    assert!(matches!(reporter.handle(&case_started(&tc)),
                     Err(ReporterError::ScenarioNotResolved { .. })));
    assert_eq!(reporter.sink().started(ItemType::Suite)[0].name, "features/broken.feature");
}

#[test]
fn test_sink_failures_propagate() {
    let mut sink = RecordingSink::new();
    sink.fail_next(SinkError::Rejected("quota exceeded".into()));
    let mut reporter = Reporter::new(sink);
    assert_eq!(reporter.handle(&LifecycleEvent::TestRunStarted).unwrap_err(),
               ReporterError::Sink(SinkError::Rejected("quota exceeded".into())));
}

#[test]
fn test_feature_description_with_step_keywords_still_resolves() {
    let uri = "features/checkout.feature";
    let text = "Feature: Checkout\n  As a shopper I want to pay\n  And I want a receipt\n  | just prose |\n\n  Scenario: Pay\n    Given a cart\n";
    let tc = TestCase::new(uri, 6, "Pay");
    let step = TestStep::pickle(7, "a cart");
    let mut reporter = Reporter::new(RecordingSink::new());
    run(&mut reporter,
        &[LifecycleEvent::TestRunStarted,
          source(uri, text),
          case_started(&tc),
          step_started(&tc, step.clone()),
          step_finished(&tc, step, StepResult::passed()),
          case_finished(&tc, Status::Passed),
          LifecycleEvent::TestRunFinished]);
    assert_eq!(reporter.sink().started(ItemType::Suite)[0].name, "Feature: Checkout");
    assert_eq!(reporter.sink().started(ItemType::Scenario)[0].name, "Scenario: Pay");
    assert_eq!(reporter.sink().started(ItemType::Step)[0].name, "Given a cart");
}
