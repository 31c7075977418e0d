//! Whole-run result actions.

use lintstream_core::{Action, LintedFile, PluginError, ResultSet, Stage, invoke};
use tracing::debug;

/// Collects every attached result and runs an action on the full set once
/// the input ends.
///
/// Files pass through untouched. The set is handed to the action exactly
/// once and is not reachable from the stage afterwards.
#[derive(Debug)]
pub struct ResultAggregator {
    action: Action<ResultSet>,
    results: ResultSet,
    finished: bool,
}

impl ResultAggregator {
    /// Run `action` on the full set at end of input.
    pub fn new(action: Action<ResultSet>) -> Self {
        Self {
            action,
            results: ResultSet::new(),
            finished: false,
        }
    }
}

impl Stage<LintedFile> for ResultAggregator {
    type Output = LintedFile;

    async fn transform(&mut self, file: LintedFile) -> Result<LintedFile, PluginError> {
        if let Some(result) = &file.result {
            self.results.push(result.clone());
        }
        Ok(file)
    }

    async fn flush(&mut self) -> Result<(), PluginError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let results = std::mem::take(&mut self.results);
        debug!(
            files = results.len(),
            errors = results.error_count(),
            warnings = results.warning_count(),
            "result set complete"
        );
        invoke(&self.action, &results).await
    }
}
