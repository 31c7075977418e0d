#![allow(dead_code)]

use futures::StreamExt;
use lintstream::{LintedFile, PluginError, SourceFile, Stage};
use std::sync::{Arc, Mutex};

// ============================================================================
// Run Helpers
// ============================================================================

/// Everything a run produced: the files that made it through, and the
/// failure that ended it, if any.
pub struct RunOutcome<T> {
    pub outputs: Vec<T>,
    pub failure: Option<PluginError>,
}

/// Drive `stage` over `files` until the run ends, keeping partial output.
pub async fn run<S>(stage: S, files: Vec<SourceFile>) -> RunOutcome<S::Output>
where
    S: Stage<SourceFile> + 'static,
{
    let mut stream = Box::pin(stage.run(futures::stream::iter(files)));
    let mut outputs = Vec::new();
    let mut failure = None;
    while let Some(item) = stream.next().await {
        match item {
            Ok(output) => outputs.push(output),
            Err(err) => {
                assert!(failure.is_none(), "a run surfaces a single failure");
                failure = Some(err);
            }
        }
    }
    RunOutcome { outputs, failure }
}

/// Results attached to the files of a run, in order.
pub fn attached(files: &[LintedFile]) -> Vec<lintstream::LintResult> {
    files.iter().filter_map(|f| f.result().cloned()).collect()
}

// ============================================================================
// Recorders
// ============================================================================

#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}
