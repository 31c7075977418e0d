use lintstream::testing::{StubEngine, fixture_file};
use lintstream::{
    Action, BoxError, FailureKind, LintMessage, LintOptions, LintResult, PluginError, ResultSet,
    Stage, lint_with, result, results,
};
use std::path::Path;
use std::time::Duration;

mod common;
use common::{Log, run};

fn engine() -> StubEngine {
    StubEngine::new()
        .with_messages("a.js", vec![LintMessage::warning("W").at(1, 1)])
        .with_messages("b.js", vec![LintMessage::error("E").at(2, 1)])
}

fn files() -> Vec<lintstream::SourceFile> {
    vec![fixture_file("a.js", "a"), fixture_file("b.js", "b")]
}

#[tokio::test]
async fn test_direct_result_action_sees_files_in_order() {
    let log = Log::default();
    let seen = log.clone();
    let stage = lint_with(engine(), LintOptions::new()).pipe(result(Action::direct(
        move |result: &LintResult| {
            seen.push(result.file_path.display().to_string());
            Ok(())
        },
    )));

    let outcome = run(stage, files()).await;
    assert!(outcome.failure.is_none());
    assert_eq!(log.entries(), vec!["a.js", "b.js"]);
}

#[tokio::test]
async fn test_callback_completed_without_error_proceeds() {
    let log = Log::default();
    let seen = log.clone();
    let stage = lint_with(engine(), LintOptions::new()).pipe(result(Action::callback(
        move |result: &LintResult, done| {
            seen.push(result.file_path.display().to_string());
            done.complete(None);
        },
    )));

    let outcome = run(stage, files()).await;
    assert!(outcome.failure.is_none());
    assert_eq!(outcome.outputs.len(), 2);
    assert_eq!(log.entries().len(), 2);
}

#[tokio::test]
async fn test_callback_completed_later_pauses_the_file() {
    let log = Log::default();
    let seen = log.clone();
    let stage = lint_with(engine(), LintOptions::new())
        .pipe(result(Action::callback(move |result: &LintResult, done| {
            let seen = seen.clone();
            let path = result.file_path.display().to_string();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                seen.push(format!("done {path}"));
                done.done();
            });
        })))
        .pipe(result(Action::direct({
            let seen = log.clone();
            move |result: &LintResult| {
                seen.push(format!("next {}", result.file_path.display()));
                Ok(())
            }
        })));

    let outcome = run(stage, files()).await;
    assert!(outcome.failure.is_none());
    assert_eq!(
        log.entries(),
        vec!["done a.js", "next a.js", "done b.js", "next b.js"]
    );
}

#[tokio::test]
async fn test_callback_error_fails_at_that_file() {
    let stage = lint_with(engine(), LintOptions::new()).pipe(result(Action::callback(
        |result: &LintResult, done| {
            if result.error_count() > 0 {
                done.fail("upload rejected");
            } else {
                done.done();
            }
        },
    )));

    let outcome = run(stage, files()).await;
    assert_eq!(outcome.outputs.len(), 1);
    let err = outcome.failure.unwrap();
    assert_eq!(err.kind(), FailureKind::Action);
    assert_eq!(err.message(), "upload rejected");
    assert_eq!(err.file_name(), Some(Path::new("b.js")));
}

#[tokio::test]
async fn test_first_outcome_wins() {
    let stage = lint_with(engine(), LintOptions::new()).pipe(result(Action::callback(
        |_: &LintResult, done| {
            done.done();
            done.fail("too late");
        },
    )));
    let outcome = run(stage, files()).await;
    assert!(outcome.failure.is_none());
}

#[tokio::test]
async fn test_panicking_action_fails_the_run() {
    let stage = lint_with(engine(), LintOptions::new()).pipe(result(Action::direct(
        |result: &LintResult| {
            if result.error_count() > 0 {
                panic!("action blew up");
            }
            Ok(())
        },
    )));
    let err = run(stage, files()).await.failure.unwrap();
    assert_eq!(err.kind(), FailureKind::Action);
    assert!(err.message().contains("action blew up"));
}

#[tokio::test]
async fn test_deferred_results_action() {
    let log = Log::default();
    let seen = log.clone();
    let stage = lint_with(engine(), LintOptions::new()).pipe(results(Action::deferred(
        move |results: &ResultSet| {
            let seen = seen.clone();
            let summary = format!(
                "{} files, {} errors, {} warnings",
                results.len(),
                results.error_count(),
                results.warning_count()
            );
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                seen.push(summary);
                let outcome: Result<(), BoxError> = Ok(());
                outcome
            }
        },
    )));

    let outcome = run(stage, files()).await;
    assert!(outcome.failure.is_none());
    assert_eq!(outcome.outputs.len(), 2);
    assert_eq!(log.entries(), vec!["2 files, 1 errors, 1 warnings"]);
}

#[tokio::test]
async fn test_deferred_rejection_is_terminal() {
    let stage = lint_with(engine(), LintOptions::new()).pipe(results(Action::deferred(
        |_: &ResultSet| async {
            let outcome: Result<(), BoxError> = Err("summary upload failed".into());
            outcome
        },
    )));

    let outcome = run(stage, files()).await;
    assert_eq!(outcome.outputs.len(), 2);
    let err = outcome.failure.unwrap();
    assert_eq!(err.message(), "summary upload failed");
    assert_eq!(err.file_name(), None);
}

#[tokio::test]
async fn test_plugin_errors_keep_their_shape() {
    let stage = lint_with(engine(), LintOptions::new()).pipe(result(Action::direct(
        |result: &LintResult| {
            Err(PluginError::policy("BudgetExceeded", "too big")
                .with_file_name(result.file_path.join("meta"))
                .into())
        },
    )));

    let err = run(stage, files()).await.failure.unwrap();
    assert_eq!(err.name(), "BudgetExceeded");
    assert_eq!(err.file_name(), Some(Path::new("a.js/meta")));
}
