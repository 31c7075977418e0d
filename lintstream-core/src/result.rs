//! Lint results and the aggregate result set.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Severity of a single lint message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, but not fatal on its own.
    Warning,
    /// A rule violation.
    Error,
}

impl Severity {
    /// Lowercase label used by formatters.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A single problem reported by the analysis engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintMessage {
    /// Rule that produced the message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// How serious the problem is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// 1-based line; `0` when the message is not tied to a location.
    #[serde(default)]
    pub line: usize,
    /// 1-based column; `0` when unknown.
    #[serde(default)]
    pub column: usize,
}

impl LintMessage {
    /// Create a message without rule or location.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: None,
            severity,
            message: message.into(),
            line: 0,
            column: 0,
        }
    }

    /// Shorthand for an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Shorthand for a warning message.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Set the location.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Set the producing rule.
    pub fn rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    /// Whether this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Whether this is a warning.
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// The line as a reportable number, `None` when unknown.
    pub fn line_number(&self) -> Option<usize> {
        (self.line > 0).then_some(self.line)
    }
}

/// The analysis outcome attached to exactly one file.
///
/// `error_count` and `warning_count` always match the messages the result
/// holds; mutate messages through [`LintResult::retain_messages`] to keep
/// that true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    /// Path of the linted file.
    pub file_path: PathBuf,
    messages: Vec<LintMessage>,
    error_count: usize,
    warning_count: usize,
    /// Fixed contents proposed by the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Set once `output` has been written back onto the file.
    pub fixed: bool,
}

impl LintResult {
    /// Build a result from messages, deriving the counts.
    pub fn new(file_path: impl Into<PathBuf>, messages: Vec<LintMessage>) -> Self {
        let mut result = Self {
            file_path: file_path.into(),
            messages,
            error_count: 0,
            warning_count: 0,
            output: None,
            fixed: false,
        };
        result.recount();
        result
    }

    /// A result without any messages.
    pub fn clean(file_path: impl Into<PathBuf>) -> Self {
        Self::new(file_path, Vec::new())
    }

    /// The warning-only result attached to a file that was supplied
    /// explicitly although the engine ignores it.
    pub fn ignored(file_path: &Path) -> Self {
        let under_node_modules = file_path
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == "node_modules"));
        let message = if under_node_modules {
            "File ignored because it has a node_modules/** path"
        } else {
            "File ignored because of a matching ignore pattern"
        };
        Self::new(file_path, vec![LintMessage::warning(message)])
    }

    /// Attach fixed contents proposed by the engine.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Messages in the order the engine reported them.
    pub fn messages(&self) -> &[LintMessage] {
        &self.messages
    }

    /// Number of error messages.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of warning messages.
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Keep only the messages matching `keep`, recomputing the counts.
    pub fn retain_messages<F>(&mut self, keep: F)
    where
        F: FnMut(&LintMessage) -> bool,
    {
        self.messages.retain(keep);
        self.recount();
    }

    /// The first message matching `predicate`, in reported order.
    pub fn first_message<F>(&self, predicate: F) -> Option<&LintMessage>
    where
        F: Fn(&LintMessage) -> bool,
    {
        self.messages.iter().find(|m| predicate(m))
    }

    fn recount(&mut self) {
        self.error_count = self.messages.iter().filter(|m| m.is_error()).count();
        self.warning_count = self.messages.iter().filter(|m| m.is_warning()).count();
    }
}

/// Every result seen by an aggregating stage, plus running totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    results: Vec<LintResult>,
    error_count: usize,
    warning_count: usize,
}

impl ResultSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result in arrival order and add its counts to the totals.
    pub fn push(&mut self, result: LintResult) {
        self.error_count += result.error_count;
        self.warning_count += result.warning_count;
        self.results.push(result);
    }

    /// Results in arrival order.
    pub fn results(&self) -> &[LintResult] {
        &self.results
    }

    /// Total errors across every result.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Total warnings across every result.
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no result was collected.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate over the results in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, LintResult> {
        self.results.iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a LintResult;
    type IntoIter = std::slice::Iter<'a, LintResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl FromIterator<LintResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = LintResult>>(iter: I) -> Self {
        let mut set = ResultSet::new();
        for result in iter {
            set.push(result);
        }
        set
    }
}
