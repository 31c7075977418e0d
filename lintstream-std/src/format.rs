//! Report formatters.
//!
//! A formatter renders a list of results into report text. Built-ins are
//! looked up by name; any callable can be used instead.

use lintstream_core::{BoxError, ConfigError, LintMessage, LintResult, Severity};
use std::fmt::{self, Write as _};
use std::sync::Arc;

/// Signature of a rendering function.
pub type FormatFn = dyn Fn(&[LintResult]) -> Result<String, BoxError> + Send + Sync;

/// Names of the built-in formatters.
pub const BUILTIN_FORMATTERS: &[&str] = &["stylish", "compact", "unix", "json"];

/// The formatter used when none is specified.
pub const DEFAULT_FORMATTER: &str = "stylish";

/// An unresolved formatter: a built-in name or a custom callable.
#[derive(Clone)]
pub enum FormatterRef {
    /// A built-in formatter name.
    Named(String),
    /// A caller-provided rendering function.
    Custom(Arc<FormatFn>),
}

impl FormatterRef {
    /// Wrap a custom rendering function.
    pub fn custom<F>(render: F) -> Self
    where
        F: Fn(&[LintResult]) -> String + Send + Sync + 'static,
    {
        FormatterRef::Custom(Arc::new(move |results| Ok(render(results))))
    }

    /// Wrap a custom rendering function that can fail.
    pub fn fallible<F>(render: F) -> Self
    where
        F: Fn(&[LintResult]) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        FormatterRef::Custom(Arc::new(render))
    }
}

impl Default for FormatterRef {
    fn default() -> Self {
        FormatterRef::Named(DEFAULT_FORMATTER.to_string())
    }
}

impl From<&str> for FormatterRef {
    fn from(name: &str) -> Self {
        FormatterRef::Named(name.to_string())
    }
}

impl From<String> for FormatterRef {
    fn from(name: String) -> Self {
        FormatterRef::Named(name)
    }
}

impl fmt::Debug for FormatterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatterRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            FormatterRef::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// A resolved, ready-to-render formatter.
#[derive(Clone)]
pub struct Formatter {
    name: String,
    render: Arc<FormatFn>,
}

impl Formatter {
    /// Resolve a name or callable, failing on unknown names.
    pub fn resolve(formatter: FormatterRef) -> Result<Self, ConfigError> {
        match formatter {
            FormatterRef::Named(name) => {
                Self::builtin(&name).ok_or(ConfigError::UnknownFormatter(name))
            }
            FormatterRef::Custom(render) => Ok(Self {
                name: "custom".to_string(),
                render,
            }),
        }
    }

    /// Look up a built-in formatter.
    pub fn builtin(name: &str) -> Option<Self> {
        let render: Arc<FormatFn> = match name {
            "stylish" => infallible(stylish),
            "compact" => infallible(compact),
            "unix" => infallible(unix),
            "json" => Arc::new(json),
            _ => return None,
        };
        Some(Self {
            name: name.to_string(),
            render,
        })
    }

    /// The built-in name, or `custom`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render `results` into report text.
    pub fn render(&self, results: &[LintResult]) -> Result<String, BoxError> {
        (self.render)(results)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter").field("name", &self.name).finish()
    }
}

fn infallible(render: fn(&[LintResult]) -> String) -> Arc<FormatFn> {
    Arc::new(move |results| Ok(render(results)))
}

fn totals(results: &[LintResult]) -> (usize, usize) {
    results.iter().fold((0, 0), |(errors, warnings), r| {
        (errors + r.error_count(), warnings + r.warning_count())
    })
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn title(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    }
}

/// Results grouped per file in aligned columns, with a summary line.
///
/// Renders nothing when there are no messages.
pub fn stylish(results: &[LintResult]) -> String {
    let mut out = String::new();
    for result in results.iter().filter(|r| !r.messages().is_empty()) {
        let _ = writeln!(out, "\n{}", result.file_path.display());

        let rows: Vec<[String; 4]> = result
            .messages()
            .iter()
            .map(|m| {
                [
                    format!("{}:{}", m.line, m.column),
                    m.severity.as_str().to_string(),
                    m.message.clone(),
                    m.rule_id.clone().unwrap_or_default(),
                ]
            })
            .collect();
        let width = |col: usize| {
            rows.iter()
                .map(|r| r[col].chars().count())
                .max()
                .unwrap_or(0)
        };
        let (loc_w, sev_w, msg_w) = (width(0), width(1), width(2));

        for [loc, sev, msg, rule] in &rows {
            let line = format!("  {loc:<loc_w$}  {sev:<sev_w$}  {msg:<msg_w$}  {rule}");
            let _ = writeln!(out, "{}", line.trim_end());
        }
    }

    let (errors, warnings) = totals(results);
    if errors + warnings > 0 {
        let _ = writeln!(
            out,
            "\n\u{2716} {} ({}, {})",
            plural(errors + warnings, "problem"),
            plural(errors, "error"),
            plural(warnings, "warning"),
        );
    }
    out
}

fn rule_suffix(message: &LintMessage, open: &str, close: &str) -> String {
    message
        .rule_id
        .as_ref()
        .map(|rule| format!("{open}{rule}{close}"))
        .unwrap_or_default()
}

/// One line per message: `path: line L, col C, Severity - text (rule)`.
pub fn compact(results: &[LintResult]) -> String {
    let mut out = String::new();
    for result in results {
        for m in result.messages() {
            let _ = writeln!(
                out,
                "{}: line {}, col {}, {} - {}{}",
                result.file_path.display(),
                m.line,
                m.column,
                title(m.severity),
                m.message,
                rule_suffix(m, " (", ")"),
            );
        }
    }
    let (errors, warnings) = totals(results);
    if errors + warnings > 0 {
        let _ = writeln!(out, "\n{}", plural(errors + warnings, "problem"));
    }
    out
}

/// One line per message: `path:line:col: text [Severity/rule]`.
pub fn unix(results: &[LintResult]) -> String {
    let mut out = String::new();
    for result in results {
        for m in result.messages() {
            let _ = writeln!(
                out,
                "{}:{}:{}: {} [{}{}]",
                result.file_path.display(),
                m.line,
                m.column,
                m.message,
                title(m.severity),
                rule_suffix(m, "/", ""),
            );
        }
    }
    let (errors, warnings) = totals(results);
    if errors + warnings > 0 {
        let _ = writeln!(out, "\n{}", plural(errors + warnings, "problem"));
    }
    out
}

/// The results serialized as a JSON array.
///
/// Fails when a result cannot be represented, e.g. a file path that is not
/// valid UTF-8.
pub fn json(results: &[LintResult]) -> Result<String, BoxError> {
    Ok(serde_json::to_string(results)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<LintResult> {
        vec![
            LintResult::new(
                "src/app.js",
                vec![
                    LintMessage::error("Missing semicolon.").at(1, 10).rule("semi"),
                    LintMessage::warning("Unexpected console statement.")
                        .at(12, 3)
                        .rule("no-console"),
                ],
            ),
            LintResult::clean("src/clean.js"),
        ]
    }

    #[test]
    fn test_resolve_builtin_and_unknown() {
        for name in BUILTIN_FORMATTERS {
            assert_eq!(Formatter::resolve((*name).into()).unwrap().name(), *name);
        }
        let err = Formatter::resolve("checkstyle".into()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFormatter(name) if name == "checkstyle"));
    }

    #[test]
    fn test_default_is_stylish() {
        let formatter = Formatter::resolve(FormatterRef::default()).unwrap();
        assert_eq!(formatter.name(), "stylish");
    }

    #[test]
    fn test_custom_formatter() {
        let formatter =
            Formatter::resolve(FormatterRef::custom(|results| format!("{} files", results.len())))
                .unwrap();
        assert_eq!(formatter.render(&sample()).unwrap(), "2 files");
    }

    #[test]
    fn test_stylish_layout() {
        let out = stylish(&sample());
        let expected = [
            "",
            "src/app.js",
            "  1:10  error    Missing semicolon.             semi",
            "  12:3  warning  Unexpected console statement.  no-console",
            "",
            "\u{2716} 2 problems (1 error, 1 warning)",
            "",
        ]
        .join("\n");
        assert_eq!(out, expected);
        assert!(!out.contains("clean.js"));
    }

    #[test]
    fn test_stylish_clean_is_empty() {
        assert_eq!(stylish(&[LintResult::clean("a.js")]), "");
    }

    #[test]
    fn test_compact_and_unix() {
        let compact = compact(&sample());
        assert!(
            compact.starts_with("src/app.js: line 1, col 10, Error - Missing semicolon. (semi)\n")
        );
        assert!(compact.ends_with("\n2 problems\n"));

        let unix = unix(&sample());
        assert!(
            unix.contains("src/app.js:12:3: Unexpected console statement. [Warning/no-console]")
        );
    }

    #[test]
    fn test_stylish_aligns_non_ascii_messages() {
        let results = [LintResult::new(
            "src/i18n.js",
            vec![
                LintMessage::error("Fehlende Übersetzung.").at(1, 1).rule("i18n"),
                LintMessage::error("Missing translation.").at(2, 1).rule("i18n"),
            ],
        )];
        let out = stylish(&results);
        assert!(out.contains("  1:1  error  Fehlende Übersetzung.  i18n\n"));
        assert!(out.contains("  2:1  error  Missing translation.   i18n\n"));
    }

    #[test]
    fn test_json_round_shape() {
        let out = json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["warningCount"], 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_json_rejects_non_utf8_path() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let path = OsString::from_vec(b"src/bad\xff.js".to_vec());
        let err = json(&[LintResult::clean(path)]).unwrap_err();
        assert!(!err.to_string().is_empty());

        let formatter = Formatter::resolve("json".into()).unwrap();
        let path = OsString::from_vec(b"src/bad\xff.js".to_vec());
        assert!(formatter.render(&[LintResult::clean(path)]).is_err());
    }
}
