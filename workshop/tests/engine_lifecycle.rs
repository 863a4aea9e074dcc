//! Engine lifecycle tests driven by scripted exercises.
//!
//! Covers registration numbering, completion bookkeeping, the show path's
//! content fallbacks and every terminal state of the run path.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use workshop::core::content::{Content, ExerciseContent};
use workshop::core::outcome::DoneError;
use workshop::engine::{Terminal, ValidationEvent};
use workshop::exercise::{DROPPED_DONE, EventKind};
use workshop::exit_codes;
use workshop::io::config::WorkshopConfig;
use workshop::test_support::{CallLog, ScriptedExercise, ScriptedMode, TestEngine};

fn verify_pass() -> ScriptedExercise {
    ScriptedExercise::with_problem("Print hello").mode("verify", ScriptedMode::pass())
}

#[test]
fn numbers_follow_registration_order() {
    let fixture = TestEngine::new().expect("fixture");
    let blank = ScriptedExercise::with_problem("x");
    let engine = fixture
        .with_exercises(&[("Hello World", &blank), ("Baby Steps", &blank), ("My First IO", &blank)])
        .expect("engine");

    let numbers: Vec<(String, usize)> = engine
        .registry()
        .iter()
        .map(|meta| (meta.name.clone(), meta.number))
        .collect();
    assert_eq!(
        numbers,
        vec![
            ("Hello World".to_string(), 1),
            ("Baby Steps".to_string(), 2),
            ("My First IO".to_string(), 3),
        ]
    );
    assert_eq!(engine.registry().resolve("baby steps").map(|m| m.number), Some(2));
}

#[test]
fn duplicate_names_are_rejected() {
    let fixture = TestEngine::new().expect("fixture");
    let blank = ScriptedExercise::with_problem("x");
    let mut engine = fixture.with_exercises(&[("Hello", &blank)]).expect("engine");
    let err = engine
        .add_exercise("hello", fixture.temp.path(), blank.factory())
        .unwrap_err();
    assert!(err.to_string().contains("hello"));
    assert_eq!(engine.registry().len(), 1);
}

#[test]
fn remaining_drops_once_per_new_completion() {
    let fixture = TestEngine::new().expect("fixture");
    let blank = ScriptedExercise::with_problem("x");
    let engine = fixture
        .with_exercises(&[("A", &blank), ("B", &blank), ("C", &blank)])
        .expect("engine");

    assert_eq!(engine.count_remaining().expect("remaining"), 3);
    engine.mark_completed("A").expect("mark");
    assert_eq!(engine.count_remaining().expect("remaining"), 2);
    engine.mark_completed("A").expect("mark again");
    assert_eq!(engine.count_remaining().expect("remaining"), 2);
    assert_eq!(engine.progress().completed().expect("completed"), vec!["A"]);
}

#[test]
fn zero_completions_leave_the_full_count() {
    let fixture = TestEngine::new().expect("fixture");
    let blank = ScriptedExercise::with_problem("x");
    let engine = fixture
        .with_exercises(&[("A", &blank), ("B", &blank)])
        .expect("engine");
    assert_eq!(engine.count_remaining().expect("remaining"), 2);
}

#[test]
fn sync_mode_renders_without_scoring() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise::with_problem("x").mode(
        "demo",
        ScriptedMode::Sync(Some(Content::txt("expected output: HELLO"))),
    );
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine
        .run_exercise("Hello", "demo", &["prog.js".to_string()])
        .expect("run");

    assert_eq!(outcome.terminal, Terminal::Informational);
    assert_eq!(outcome.exit_code(), exit_codes::OK);
    assert!(fixture.out.contents().contains("expected output: HELLO"));
    assert!(engine.progress().completed().expect("completed").is_empty());
    assert_eq!(
        exercise.log.entries(),
        vec!["init:Hello:1", "run:demo:prog.js"]
    );
}

#[test]
fn sync_mode_error_is_reported() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise::with_problem("x")
        .mode("demo", ScriptedMode::SyncError("no such file".to_string()));
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "demo", &[]).expect("run");

    assert!(matches!(outcome.terminal, Terminal::Reported(ref m) if m.contains("no such file")));
    assert!(fixture.err.contents().contains("Unexpected error while running \"demo\""));
}

#[test]
fn done_false_fails_without_completing() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise::with_problem("x").mode("verify", ScriptedMode::fail());
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "verify", &[]).expect("run");

    assert_eq!(outcome.terminal, Terminal::Failed);
    assert_eq!(outcome.exit_code(), exit_codes::FAIL);
    assert!(engine.progress().completed().expect("completed").is_empty());
    let out = fixture.out.contents();
    assert!(out.contains("# FAIL"));
    assert!(out.contains("did not match the expected output"));
    assert_eq!(exercise.log.entries().last().map(String::as_str), Some("end:verify:false"));
}

#[test]
fn done_true_passes_and_completes_once() {
    let fixture = TestEngine::new().expect("fixture");
    let mut exercise = verify_pass();
    exercise.content.solution = Some(Content::txt("console.log('HELLO')"));
    let other = ScriptedExercise::with_problem("y");
    let mut engine = fixture
        .with_exercises(&[("Hello", &exercise), ("Next One", &other)])
        .expect("engine");

    let outcome = engine.run_exercise("Hello", "verify", &[]).expect("run");
    assert_eq!(outcome.terminal, Terminal::Passed);
    assert_eq!(outcome.exit_code(), exit_codes::OK);

    let out = fixture.out.contents();
    let pass = out.find("# PASS").expect("pass title");
    let message = out.find("Your solution to Hello passed!").expect("pass message");
    let compare = out.find("official solution").expect("compare note");
    let solution = out.find("console.log('HELLO')").expect("solution");
    let remaining = out.find("You have 1 challenge left.").expect("remaining");
    assert!(pass < message && message < compare && compare < solution && solution < remaining);
    assert!(out.contains("Type 'learnyou' to show the menu."));

    engine.run_exercise("Hello", "verify", &[]).expect("run again");
    assert_eq!(engine.progress().completed().expect("completed"), vec!["Hello"]);
    assert_eq!(exercise.log.entries().last().map(String::as_str), Some("end:verify:true"));
}

#[test]
fn last_pass_shows_finished_message() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = verify_pass();
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    engine.run_exercise("Hello", "verify", &[]).expect("run");

    let out = fixture.out.contents();
    assert!(out.contains("You've finished all the challenges! Hooray!"));
    assert!(!out.contains("challenge left"));
    assert!(!out.contains("official solution"));
}

#[test]
fn solution_files_are_listed_unless_hidden() {
    let fixture = TestEngine::new().expect("fixture");
    let mut exercise = verify_pass();
    exercise.solution = Some(Ok(vec![PathBuf::from("/solutions/hello.js")]));
    let mut hidden = exercise.clone();
    hidden.content.hide_solutions = true;
    let mut engine = fixture
        .with_exercises(&[("Hello", &exercise), ("Hidden", &hidden)])
        .expect("engine");

    engine.run_exercise("Hello", "verify", &[]).expect("run");
    assert!(fixture.out.contents().contains("file:///solutions/hello.js"));

    let before = fixture.out.contents().len();
    engine.run_exercise("Hidden", "verify", &[]).expect("run hidden");
    let hidden_out = &fixture.out.contents()[before..];
    assert!(hidden_out.contains("# PASS"));
    assert!(!hidden_out.contains("file://"));
    assert!(!hidden_out.contains("official solution"));
}

#[test]
fn solution_listing_error_stops_before_completion() {
    let fixture = TestEngine::new().expect("fixture");
    let mut exercise = verify_pass();
    exercise.solution = Some(Err("permission denied".to_string()));
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "verify", &[]).expect("run");

    assert!(matches!(outcome.terminal, Terminal::Reported(_)));
    assert!(fixture.err.contents().contains("permission denied"));
    assert!(engine.progress().completed().expect("completed").is_empty());
    assert!(!exercise.log.entries().iter().any(|e| e.starts_with("end:")));
}

#[test]
fn declared_fail_message_forces_failure() {
    let fixture = TestEngine::new().expect("fixture");
    let mut exercise = verify_pass();
    exercise.content.fail = Some(Content::txt("Read the hint and try again."));
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "verify", &[]).expect("run");

    assert_eq!(outcome.terminal, Terminal::Failed);
    assert!(fixture.out.contents().contains("Read the hint and try again."));
    assert!(engine.progress().completed().expect("completed").is_empty());
}

#[test]
fn blank_fail_message_is_ignored() {
    let fixture = TestEngine::new().expect("fixture");
    let mut passing = verify_pass();
    passing.content.fail = Some(Content::txt(""));
    passing.content.pass = Some(Content::txt("  \n"));
    let mut failing = ScriptedExercise::with_problem("x").mode("verify", ScriptedMode::fail());
    failing.content.fail = Some(Content::txt(""));
    let mut engine = fixture
        .with_exercises(&[("Hello", &passing), ("Steps", &failing)])
        .expect("engine");

    let passed = engine.run_exercise("Hello", "verify", &[]).expect("run");
    assert_eq!(passed.terminal, Terminal::Passed);
    assert!(fixture.out.contents().contains("# PASS"));
    assert_eq!(engine.progress().completed().expect("completed"), vec!["Hello".to_string()]);

    let before = fixture.out.contents().len();
    let failed = engine.run_exercise("Steps", "verify", &[]).expect("run");
    assert_eq!(failed.terminal, Terminal::Failed);
    assert!(fixture.out.contents()[before..].contains("# FAIL"));
}

#[test]
fn done_error_cleans_up_then_reports() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise::with_problem("x").mode(
        "verify",
        ScriptedMode::done(DoneError::Failure("boom".to_string()), None),
    );
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "verify", &[]).expect("run");

    assert_eq!(outcome.terminal, Terminal::Errored("boom".to_string()));
    assert_eq!(outcome.exit_code(), exit_codes::FAIL);
    assert_eq!(exercise.log.entries().last().map(String::as_str), Some("end:verify:true"));
    let err = fixture.err.contents();
    assert!(err.contains("Unexpected error"));
    assert!(err.contains("boom"));
    assert!(engine.progress().completed().expect("completed").is_empty());
}

#[test]
fn legacy_flag_completion_is_reinterpreted() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise::with_problem("x")
        .mode("verify", ScriptedMode::done(DoneError::Flag(true), None));
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "verify", &[]).expect("run");

    assert_eq!(outcome.terminal, Terminal::Passed);
}

#[test]
fn dropped_completion_handle_is_an_error() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise::with_problem("x").mode("verify", ScriptedMode::Abandon);
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "verify", &[]).expect("run");

    assert!(matches!(outcome.terminal, Terminal::Errored(ref m) if m.contains("without reporting")));
    assert_eq!(exercise.log.entries().last().map(String::as_str), Some("end:verify:true"));
}

#[test]
fn dropped_completion_handle_with_live_events_is_an_error() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise::with_problem("x").mode("verify", ScriptedMode::KeepEvents);
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "verify", &[]).expect("run");

    assert!(matches!(outcome.terminal, Terminal::Errored(ref m) if m.contains(DROPPED_DONE)));
    assert_eq!(outcome.exit_code(), exit_codes::FAIL);
    assert_eq!(exercise.log.entries().last().map(String::as_str), Some("end:verify:true"));
}

#[test]
fn completion_from_another_thread_is_awaited() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise::with_problem("x")
        .mode("verify", ScriptedMode::Threaded { pass: true });
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "verify", &[]).expect("run");

    assert_eq!(outcome.terminal, Terminal::Passed);
    assert!(fixture.out.contents().contains("checked on a worker thread"));
}

#[test]
fn run_mode_never_scores() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise::with_problem("x").mode("run", ScriptedMode::pass());
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "run", &[]).expect("run");

    assert_eq!(outcome.terminal, Terminal::Ran);
    assert!(engine.progress().completed().expect("completed").is_empty());
    assert!(!fixture.out.contents().contains("PASS"));
    assert_eq!(exercise.log.entries().last().map(String::as_str), Some("end:run:true"));
}

#[test]
fn unsupported_modes_are_reported() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise::with_problem("x")
        .mode("verify", ScriptedMode::NotCallable("string".to_string()));
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let not_callable = engine.run_exercise("Hello", "verify", &[]).expect("verify");
    let missing = engine.run_exercise("Hello", "run", &[]).expect("run");

    assert_eq!(not_callable.exit_code(), exit_codes::INVALID);
    assert_eq!(missing.exit_code(), exit_codes::INVALID);
    let err = fixture.err.contents();
    assert!(err.contains("The \"verify\" mode is a string."));
    assert!(err.contains("doesn't have a \"run\" mode"));
}

#[test]
fn missing_exercise_is_reported_without_store_mutation() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = verify_pass();
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    assert!(engine.load_exercise("Nope").is_none());
    let shown = engine.print_exercise("Nope").expect("print");
    let run = engine.run_exercise("Nope", "verify", &[]).expect("run");

    assert_eq!(shown.terminal, Terminal::Reported("No such exercise: Nope".to_string()));
    assert_eq!(run.exit_code(), exit_codes::INVALID);
    assert_eq!(engine.progress().current().expect("current"), None);
    assert!(engine.progress().completed().expect("completed").is_empty());
    assert!(!fixture.temp.path().join("progress").exists());
}

#[test]
fn show_marks_current_before_prepare() {
    let fixture = TestEngine::new().expect("fixture");
    let mut exercise = ScriptedExercise::with_problem("x");
    exercise.prepare_error = Some("network down".to_string());
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.print_exercise("Hello").expect("print");

    assert_eq!(outcome.exit_code(), exit_codes::INVALID);
    assert!(fixture.err.contents().contains("Could not prepare the exercise: network down"));
    assert_eq!(
        engine.progress().current().expect("current"),
        Some("Hello".to_string())
    );
    assert_eq!(exercise.log.entries(), vec!["init:Hello:1", "prepare"]);
}

#[test]
fn generated_text_failure_is_reported() {
    let fixture = TestEngine::new().expect("fixture");
    let mut exercise = ScriptedExercise::with_problem("x");
    exercise.generated_error = Some("template missing".to_string());
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.print_exercise("Hello").expect("print");

    assert!(matches!(outcome.terminal, Terminal::Reported(ref m) if m.contains("template missing")));
    assert!(fixture.out.contents().is_empty());
}

#[test]
fn problem_and_generated_text_both_render() {
    let fixture = TestEngine::new().expect("fixture");
    let mut exercise = ScriptedExercise::with_problem("Static problem");
    exercise.generated = Some(Content::txt("Generated part"));
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    engine.print_exercise("Hello").expect("print");

    let out = fixture.out.contents();
    let stat = out.find("Static problem").expect("static");
    let generated = out.find("Generated part").expect("generated");
    assert!(stat < generated);
}

#[test]
fn header_falls_back_to_workshop_header() {
    let fixture = TestEngine::new().expect("fixture");
    let mut config = WorkshopConfig::named("learnyou");
    config.header = Some("Workshop header".to_string());
    config.footer = Some("Workshop footer".to_string());

    let plain = ScriptedExercise::with_problem("Problem A");
    let mut own = ScriptedExercise::with_problem("Problem B");
    own.content.header = Some(Content::txt("Own header"));
    own.content.footer = Some(Content::txt(""));

    let mut engine = fixture.engine(config).expect("engine");
    engine
        .add_exercise("A", fixture.temp.path(), plain.factory())
        .expect("add");
    engine
        .add_exercise("B", fixture.temp.path(), own.factory())
        .expect("add");

    engine.print_exercise("A").expect("print A");
    let first = fixture.out.contents();
    assert_eq!(first, "Workshop header\nProblem A\nWorkshop footer\n");

    engine.print_exercise("B").expect("print B");
    let second = &fixture.out.contents()[first.len()..];
    assert_eq!(second, "Own header\nProblem B\nWorkshop footer\n");
}

#[test]
fn problem_file_is_the_fallback_for_problem_text() {
    let fixture = TestEngine::new().expect("fixture");
    let problem = fixture.temp.path().join("problem.md");
    std::fs::write(&problem, "# Hello\nWrite a program.\n").expect("write problem");
    let exercise = ScriptedExercise {
        content: ExerciseContent {
            problem_file: Some(problem),
            ..ExerciseContent::default()
        },
        ..ScriptedExercise::default()
    };
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.print_exercise("Hello").expect("print");

    assert_eq!(outcome.terminal, Terminal::Displayed);
    assert_eq!(fixture.out.contents(), "# Hello\nWrite a program.\n");
}

#[test]
fn nothing_renders_without_any_problem() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise {
        content: ExerciseContent {
            problem: Some(Content::txt("   ")),
            problem_file: Some(fixture.temp.path().join("missing.md")),
            ..ExerciseContent::default()
        },
        ..ScriptedExercise::default()
    };
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.print_exercise("Hello").expect("print");

    assert_eq!(
        outcome.terminal,
        Terminal::Reported("The exercise \"Hello\" is missing a problem definition!".to_string())
    );
    assert!(fixture.out.contents().is_empty());
}

#[test]
fn unreadable_problem_file_is_reported() {
    let fixture = TestEngine::new().expect("fixture");
    let problem = fixture.temp.path().join("problem.md");
    std::fs::write(&problem, [0xff, 0xfe, b'h', b'i']).expect("write problem");
    let exercise = ScriptedExercise {
        content: ExerciseContent {
            problem_file: Some(problem),
            ..ExerciseContent::default()
        },
        ..ScriptedExercise::default()
    };
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.print_exercise("Hello").expect("print");

    assert!(matches!(outcome.terminal, Terminal::Reported(ref m) if m.contains("problem.md")));
    assert_eq!(outcome.exit_code(), exit_codes::INVALID);
    assert!(fixture.err.contents().contains("Could not load the exercise text"));
    assert!(fixture.out.contents().is_empty());
}

#[test]
fn observers_see_events_in_order() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = ScriptedExercise::with_problem("x").mode(
        "verify",
        ScriptedMode::Callback {
            events: vec![
                (EventKind::Pass, "prints HELLO".to_string()),
                (EventKind::Fail, "exits with 0".to_string()),
            ],
            err: DoneError::Absent,
            pass: Some(false),
        },
    );
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");
    let seen: Rc<RefCell<Vec<ValidationEvent>>> = Rc::default();
    let sink = seen.clone();
    engine.on_validation(move |event| sink.borrow_mut().push(event.clone()));

    engine.run_exercise("Hello", "verify", &[]).expect("run");

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].kind, EventKind::Pass);
    assert_eq!(seen[0].message, "prints HELLO");
    assert_eq!(seen[1].kind, EventKind::Fail);
    assert_eq!(seen[1].exercise, "Hello");
    assert_eq!(seen[1].mode, "verify");
    let out = fixture.out.contents();
    assert!(out.contains("\u{2713} prints HELLO"));
    assert!(out.contains("\u{2717} exits with 0"));
}

#[test]
fn completion_hook_runs_after_output_and_before_cleanup() {
    let fixture = TestEngine::new().expect("fixture");
    let exercise = verify_pass();
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let out = fixture.out.clone();
    let log: CallLog = exercise.log.clone();
    engine.set_on_complete(move |meta| {
        assert!(out.contents().contains("# PASS"));
        log.push(format!("complete:{}", meta.name));
    });

    engine.run_exercise("Hello", "verify", &[]).expect("run");

    let entries = exercise.log.entries();
    let tail: Vec<&str> = entries.iter().rev().take(2).rev().map(String::as_str).collect();
    assert_eq!(tail, vec!["complete:Hello", "end:verify:true"]);
    assert!(!fixture.out.contents().contains("finished all the challenges"));
}

#[test]
fn cleanup_failure_is_reported_without_changing_the_exit_code() {
    let fixture = TestEngine::new().expect("fixture");
    let mut exercise = verify_pass();
    exercise.end_error = Some("temp dir busy".to_string());
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "verify", &[]).expect("run");

    assert_eq!(outcome.terminal, Terminal::Passed);
    assert_eq!(outcome.exit_code(), exit_codes::OK);
    assert!(
        outcome
            .cleanup_error
            .as_deref()
            .is_some_and(|m| m.contains("temp dir busy"))
    );
    assert!(fixture.err.contents().contains("Could not clean up after the exercise"));
}

#[test]
fn cleanup_failure_replaces_the_unexpected_error_report() {
    let fixture = TestEngine::new().expect("fixture");
    let mut exercise = ScriptedExercise::with_problem("x").mode(
        "verify",
        ScriptedMode::done(DoneError::Failure("boom".to_string()), None),
    );
    exercise.end_error = Some("temp dir busy".to_string());
    let mut engine = fixture.with_exercises(&[("Hello", &exercise)]).expect("engine");

    let outcome = engine.run_exercise("Hello", "verify", &[]).expect("run");

    assert_eq!(outcome.exit_code(), exit_codes::FAIL);
    let err = fixture.err.contents();
    assert!(err.contains("temp dir busy"));
    assert!(!err.contains("Unexpected error"));
}

#[test]
fn menu_marks_completed_exercises() {
    let fixture = TestEngine::new().expect("fixture");
    let blank = ScriptedExercise::with_problem("x");
    let engine = fixture
        .with_exercises(&[("Hello", &blank), ("Baby Steps", &blank)])
        .expect("engine");
    engine.mark_completed("Baby Steps").expect("mark");

    let menu = engine.menu(&workshop::commands::MENU_COMMANDS).expect("menu");

    let markers: Vec<(&str, &str)> = menu
        .items
        .iter()
        .map(|entry| (entry.label.as_str(), entry.marker.as_str()))
        .collect();
    assert_eq!(
        markers,
        vec![("» Hello", ""), ("» Baby Steps", "[COMPLETED]")]
    );
}
