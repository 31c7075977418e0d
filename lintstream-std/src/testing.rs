//! Testing utilities for lintstream.
//!
//! This module provides stand-ins for the pipeline's collaborators so stages
//! can be exercised without a real analysis engine or terminal.
//!
//! # Features
//!
//! - [`StubEngine`]: An engine with canned results, ignore rules and injected failures
//! - [`RecordingSink`]: A sink that records every report written to it
//! - [`fixture_file`]: Builds buffered files under a fixed working directory

use crate::sink::SinkRef;
use lintstream_core::{BoxError, Engine, LintMessage, LintResult, SourceFile};
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Working directory used by [`fixture_file`].
pub const FIXTURE_CWD: &str = "/project";

/// A buffered file at `relative` under [`FIXTURE_CWD`].
pub fn fixture_file(relative: &str, contents: &str) -> SourceFile {
    SourceFile::buffered(
        Path::new(FIXTURE_CWD).join(relative),
        FIXTURE_CWD,
        contents.as_bytes(),
    )
}

// ============================================================================
// Stub Engine
// ============================================================================

#[derive(Debug, Default)]
struct Script {
    messages: HashMap<PathBuf, Vec<LintMessage>>,
    outputs: HashMap<PathBuf, String>,
    ignored: HashSet<PathBuf>,
    failures: HashMap<PathBuf, String>,
}

/// An engine that answers from a script keyed by relative path.
///
/// Paths without scripted messages lint clean. Clones share the script and
/// the call log.
///
/// # Example
///
/// ```rust,ignore
/// let engine = StubEngine::new()
///     .with_messages("src/a.js", vec![LintMessage::error("boom").at(3, 1)])
///     .ignoring("vendor/lib.js");
///
/// let calls = engine.clone();
/// // run the pipeline...
/// assert_eq!(calls.lint_calls(), vec![PathBuf::from("src/a.js")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubEngine {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

impl StubEngine {
    /// Create an engine where every file lints clean.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `messages` for the file at `relative`.
    pub fn with_messages(self, relative: impl Into<PathBuf>, messages: Vec<LintMessage>) -> Self {
        self.script
            .lock()
            .unwrap()
            .messages
            .insert(relative.into(), messages);
        self
    }

    /// Propose `output` as the fixed contents of the file at `relative`.
    pub fn with_output(self, relative: impl Into<PathBuf>, output: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .outputs
            .insert(relative.into(), output.into());
        self
    }

    /// Treat the file at `relative` as ignored.
    pub fn ignoring(self, relative: impl Into<PathBuf>) -> Self {
        self.script.lock().unwrap().ignored.insert(relative.into());
        self
    }

    /// Fail when linting the file at `relative`.
    pub fn failing(self, relative: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .failures
            .insert(relative.into(), message.into());
        self
    }

    /// Paths passed to `lint_text`, in call order.
    pub fn lint_calls(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Source texts passed to `lint_text`, in call order.
    pub fn sources(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, source)| source.clone())
            .collect()
    }

    /// Number of `lint_text` calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Engine for StubEngine {
    fn is_path_ignored(&self, relative_path: &Path) -> bool {
        self.script.lock().unwrap().ignored.contains(relative_path)
    }

    fn lint_text(&self, source: &str, relative_path: &Path) -> Result<LintResult, BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((relative_path.to_path_buf(), source.to_string()));

        let script = self.script.lock().unwrap();
        if let Some(message) = script.failures.get(relative_path) {
            return Err(message.clone().into());
        }
        let messages = script
            .messages
            .get(relative_path)
            .cloned()
            .unwrap_or_default();
        let mut result = LintResult::new(relative_path, messages);
        result.output = script.outputs.get(relative_path).cloned();
        Ok(result)
    }
}

// ============================================================================
// Recording Sink
// ============================================================================

/// A sink that records every report written to it.
///
/// # Example
///
/// ```rust,ignore
/// let sink = RecordingSink::new();
/// let stage = format("compact", sink.sink_ref())?;
/// // run the pipeline...
/// assert_eq!(sink.count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct RecordingSink {
    writes: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink reference that records into this sink.
    pub fn sink_ref(&self) -> SinkRef {
        let writes = self.writes.clone();
        SinkRef::callback(move |report| {
            writes.lock().unwrap().push(report.to_string());
            Ok(())
        })
    }

    /// Every report written so far.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    /// Number of writes.
    pub fn count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}
