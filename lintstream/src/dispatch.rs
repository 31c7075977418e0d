//! Per-file result actions.

use lintstream_core::{Action, LintResult, LintedFile, PluginError, Stage, invoke};

/// Runs an action on each attached result as the file passes by.
///
/// Files without a result pass through untouched. A failing action ends
/// the run at that file; failures that do not name a file are attributed
/// to the result's file.
#[derive(Debug)]
pub struct ResultDispatcher {
    action: Action<LintResult>,
}

impl ResultDispatcher {
    /// Run `action` on each attached result.
    pub fn new(action: Action<LintResult>) -> Self {
        Self { action }
    }
}

impl Stage<LintedFile> for ResultDispatcher {
    type Output = LintedFile;

    async fn transform(&mut self, file: LintedFile) -> Result<LintedFile, PluginError> {
        if let Some(result) = &file.result {
            invoke(&self.action, result).await.map_err(|err| {
                if err.file_name().is_some() {
                    err
                } else {
                    err.with_file_name(&result.file_path)
                }
            })?;
        }
        Ok(file)
    }
}
