//! Fail policies built on the dispatcher and the aggregator.

use crate::aggregate::ResultAggregator;
use crate::dispatch::ResultDispatcher;
use lintstream_core::{
    Action, BoxError, LINT_ERROR, LINT_WARNING, LintMessage, LintResult, PluginError, ResultSet,
};

/// Fail at the first file whose result contains an error.
///
/// The failure names the file, and the line and text of the first error
/// message in reported order.
pub fn fail_on_error() -> ResultDispatcher {
    ResultDispatcher::new(Action::direct(|result: &LintResult| {
        fail_on_first(result, LintMessage::is_error, LINT_ERROR)
    }))
}

/// Fail at the first file whose result contains a warning.
pub fn fail_on_warning() -> ResultDispatcher {
    ResultDispatcher::new(Action::direct(|result: &LintResult| {
        fail_on_first(result, LintMessage::is_warning, LINT_WARNING)
    }))
}

/// Fail once the input ends if any result contains an error.
pub fn fail_after_error() -> ResultAggregator {
    ResultAggregator::new(Action::direct(|results: &ResultSet| {
        let errors = results.error_count();
        if errors == 0 {
            return Ok(());
        }
        let message = format!("Failed with {}", counted(errors, "error", "errors"));
        Err(PluginError::policy(LINT_ERROR, message).into())
    }))
}

/// Fail once the input ends if any result contains an error or a warning.
pub fn fail_after_warning() -> ResultAggregator {
    ResultAggregator::new(Action::direct(|results: &ResultSet| {
        let issues = results.error_count() + results.warning_count();
        if issues == 0 {
            return Ok(());
        }
        let message = format!("Failed with {}", counted(issues, "issue", "issues"));
        Err(PluginError::policy(LINT_WARNING, message).into())
    }))
}

fn fail_on_first(
    result: &LintResult,
    predicate: fn(&LintMessage) -> bool,
    name: &str,
) -> Result<(), BoxError> {
    let Some(message) = result.first_message(predicate) else {
        return Ok(());
    };
    let mut err = PluginError::policy(name, message.message.clone())
        .with_file_name(&result.file_path);
    if let Some(line) = message.line_number() {
        err = err.with_line_number(line);
    }
    Err(err.into())
}

fn counted(count: usize, singular: &str, plural: &str) -> String {
    format!("{count} {}", if count == 1 { singular } else { plural })
}
