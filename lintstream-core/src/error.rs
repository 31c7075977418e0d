//! Error types for lintstream.
//!
//! Errors are split by the moment they can happen:
//!
//! - [`ConfigError`] - Raised while a stage is being constructed, before any
//!   file is processed (unknown formatter, invalid sink, bad options).
//! - [`PluginError`] - The single failure record a running pipeline surfaces.
//!   Every run-time failure (unsupported contents, engine errors, policy
//!   thresholds, failing actions) is normalized into it.
//! - [`ActionError`] - Failure modes specific to action invocation, wrapped
//!   into a [`PluginError`] by the invoker.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A boxed error type for collaborator and action failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Name reported by policy failures triggered by errors.
pub const LINT_ERROR: &str = "LintError";

/// Name reported by policy failures triggered by warnings.
pub const LINT_WARNING: &str = "LintWarning";

/// Errors raised synchronously while building a pipeline stage.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No built-in formatter is registered under the given name.
    #[error("unknown formatter: {0}")]
    UnknownFormatter(String),

    /// The named output sink cannot be resolved.
    #[error("unknown output sink: {0}")]
    UnknownSink(String),

    /// The option input could not be deserialized.
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// A single option carries an unusable value.
    #[error("invalid option `{option}`: {reason}")]
    InvalidOption {
        /// The offending option key.
        option: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The analysis engine could not be constructed.
    #[error("failed to construct lint engine")]
    Engine(#[source] BoxError),
}

/// Failure modes of the action invoker itself.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The action panicked while running.
    #[error("action panicked: {0}")]
    Panicked(String),

    /// Every completion handle was dropped without reporting an outcome.
    #[error("action dropped its completion without reporting an outcome")]
    Abandoned,
}

/// Category of a run-time pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The file carries contents the pipeline cannot consume.
    Capability,
    /// The analysis engine failed on a file.
    Engine,
    /// An error or warning threshold was crossed.
    Policy,
    /// A registered action failed.
    Action,
}

impl FailureKind {
    fn default_name(self) -> &'static str {
        match self {
            FailureKind::Capability => "UnsupportedContents",
            FailureKind::Engine => "EngineError",
            FailureKind::Policy => LINT_ERROR,
            FailureKind::Action => "ActionError",
        }
    }
}

/// The structured failure surfaced by a running pipeline.
///
/// Carries a `name`, a `message`, and, for failures tied to a file, the file
/// name and line number that triggered it.
#[derive(Error, Debug)]
#[error("{name}: {message}")]
pub struct PluginError {
    name: String,
    message: String,
    file_name: Option<PathBuf>,
    line_number: Option<usize>,
    kind: FailureKind,
    #[source]
    source: Option<BoxError>,
}

impl PluginError {
    /// Create a failure of the given kind with its default name.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            name: kind.default_name().to_string(),
            message: message.into(),
            file_name: None,
            line_number: None,
            kind,
            source: None,
        }
    }

    /// A policy failure with an explicit name (`LintError` or `LintWarning`).
    pub fn policy(name: &str, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Policy, message).with_name(name)
    }

    /// The pipeline only consumes buffered contents.
    pub fn streaming_not_supported(path: &Path) -> Self {
        Self::new(
            FailureKind::Capability,
            "streaming contents are not supported; buffer the file first",
        )
        .with_file_name(path)
    }

    /// Wrap an engine failure for the file at `path`.
    pub fn engine(path: &Path, err: BoxError) -> Self {
        Self {
            message: err.to_string(),
            source: Some(err),
            ..Self::new(FailureKind::Engine, String::new())
        }
        .with_file_name(path)
    }

    /// Normalize an action failure.
    ///
    /// Errors that already are a `PluginError` pass through unchanged.
    pub fn from_action(err: BoxError) -> Self {
        match err.downcast::<PluginError>() {
            Ok(plugin) => *plugin,
            Err(other) => Self {
                message: other.to_string(),
                source: Some(other),
                ..Self::new(FailureKind::Action, String::new())
            },
        }
    }

    /// Replace the failure name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attach the file that triggered the failure.
    pub fn with_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_name = Some(path.into());
        self
    }

    /// Attach the line that triggered the failure.
    pub fn with_line_number(mut self, line: usize) -> Self {
        self.line_number = Some(line);
        self
    }

    /// The failure name, e.g. `LintError`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The file that triggered the failure, if any.
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    /// The line that triggered the failure, if any.
    pub fn line_number(&self) -> Option<usize> {
        self.line_number
    }

    /// The failure category.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_action_keeps_plugin_errors() {
        let original = PluginError::policy(LINT_WARNING, "first warning")
            .with_file_name("src/a.js")
            .with_line_number(3);
        let normalized = PluginError::from_action(Box::new(original));

        assert_eq!(normalized.name(), LINT_WARNING);
        assert_eq!(normalized.kind(), FailureKind::Policy);
        assert_eq!(normalized.file_name(), Some(Path::new("src/a.js")));
        assert_eq!(normalized.line_number(), Some(3));
    }

    #[test]
    fn test_from_action_wraps_foreign_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let normalized = PluginError::from_action(Box::new(io));

        assert_eq!(normalized.kind(), FailureKind::Action);
        assert_eq!(normalized.name(), "ActionError");
        assert_eq!(normalized.message(), "pipe closed");
        assert!(std::error::Error::source(&normalized).is_some());
    }

    #[test]
    fn test_display() {
        let err = PluginError::policy(LINT_ERROR, "Failed with 2 errors");
        assert_eq!(err.to_string(), "LintError: Failed with 2 errors");
    }

    #[test]
    fn test_engine_error_carries_path() {
        let err = PluginError::engine(Path::new("lib/x.js"), "parse failure".into());
        assert_eq!(err.kind(), FailureKind::Engine);
        assert_eq!(err.message(), "parse failure");
        assert_eq!(err.file_name(), Some(Path::new("lib/x.js")));
    }
}
