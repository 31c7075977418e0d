//! Pipeline options and legacy option migration.
//!
//! [`LintOptions`] is the typed configuration of the lint stage. Options can
//! also be read from JSON, where older key spellings are translated once by
//! a pure migration step before the pipeline is built.

use lintstream_core::{ConfigError, EngineOptions, LintMessage, LintResult};
use serde::Deserialize;
use serde_json::Value;
use std::{collections::BTreeMap, fmt, path::PathBuf, sync::Arc};

/// Predicate deciding which messages survive quiet filtering.
pub type QuietFn = dyn Fn(&LintMessage) -> bool + Send + Sync;

/// Message filtering applied to every result.
#[derive(Clone, Default)]
pub enum Quiet {
    /// Keep every message.
    #[default]
    Off,
    /// Keep errors, drop warnings.
    ErrorsOnly,
    /// Keep the messages matching the predicate.
    Custom(Arc<QuietFn>),
}

impl Quiet {
    /// Filter with a custom predicate.
    pub fn custom<F>(keep: F) -> Self
    where
        F: Fn(&LintMessage) -> bool + Send + Sync + 'static,
    {
        Quiet::Custom(Arc::new(keep))
    }

    /// Filter `result` in place; counts are recomputed.
    pub fn apply(&self, result: &mut LintResult) {
        match self {
            Quiet::Off => {}
            Quiet::ErrorsOnly => result.retain_messages(LintMessage::is_error),
            Quiet::Custom(keep) => result.retain_messages(|m| keep(m)),
        }
    }
}

impl From<bool> for Quiet {
    fn from(quiet: bool) -> Self {
        if quiet { Quiet::ErrorsOnly } else { Quiet::Off }
    }
}

impl fmt::Debug for Quiet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quiet::Off => f.write_str("Off"),
            Quiet::ErrorsOnly => f.write_str("ErrorsOnly"),
            Quiet::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Configuration of the lint stage.
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Message filtering applied before a result is attached.
    pub quiet: Quiet,
    /// Attach a warning result to explicitly supplied files the engine ignores.
    pub warn_file_ignored: bool,
    /// Passed through to the engine factory.
    pub engine: EngineOptions,
}

impl LintOptions {
    /// Default options: no filtering, no ignore warnings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set message filtering; `true` keeps errors only.
    pub fn quiet(mut self, quiet: impl Into<Quiet>) -> Self {
        self.quiet = quiet.into();
        self
    }

    /// Warn about explicitly supplied files the engine ignores.
    pub fn warn_file_ignored(mut self, warn: bool) -> Self {
        self.warn_file_ignored = warn;
        self
    }

    /// Ask the engine to propose fixes.
    pub fn fix(mut self, fix: bool) -> Self {
        self.engine.fix = fix;
        self
    }

    /// Replace the engine passthrough options.
    pub fn engine(mut self, engine: EngineOptions) -> Self {
        self.engine = engine;
        self
    }

    /// Read options from a JSON value, migrating legacy keys.
    ///
    /// A bare string is shorthand for `{ "configFile": <string> }`; `null`
    /// yields the defaults.
    pub fn from_json(value: Value) -> Result<Self, ConfigError> {
        let raw = match value {
            Value::Null => RawOptions::default(),
            Value::String(path) => RawOptions {
                config_file: Some(path.into()),
                ..RawOptions::default()
            },
            other => serde_json::from_value(other)?,
        };
        migrate(raw)
    }

    /// Read options from JSON text; see [`LintOptions::from_json`].
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Self::from_json(serde_json::from_str(text)?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Toggles {
    List(Vec<String>),
    Map(BTreeMap<String, bool>),
}

/// Option input as written by callers, including legacy spellings.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawOptions {
    quiet: Option<bool>,
    warn_file_ignored: Option<bool>,
    config_file: Option<PathBuf>,
    config: Option<PathBuf>,
    rule_paths: Option<OneOrMany<PathBuf>>,
    rulesdir: Option<OneOrMany<PathBuf>>,
    globals: Option<Toggles>,
    envs: Option<Toggles>,
    plugins: Option<Vec<String>>,
    rules: Option<BTreeMap<String, Value>>,
    fix: Option<bool>,
    ignore: Option<bool>,
    ignore_path: Option<PathBuf>,
    use_config_files: Option<bool>,
    use_eslintrc: Option<bool>,
}

fn migrate(raw: RawOptions) -> Result<LintOptions, ConfigError> {
    let defaults = EngineOptions::default();

    let globals = match raw.globals {
        None => BTreeMap::new(),
        Some(Toggles::Map(map)) => map,
        Some(Toggles::List(list)) => parse_globals(list)?,
    };
    let envs = match raw.envs {
        None => Vec::new(),
        Some(Toggles::List(list)) => list,
        Some(Toggles::Map(map)) => map
            .into_iter()
            .filter_map(|(env, enabled)| enabled.then_some(env))
            .collect(),
    };

    let engine = EngineOptions {
        config_file: raw.config_file.or(raw.config),
        rule_paths: raw
            .rule_paths
            .or(raw.rulesdir)
            .map(OneOrMany::into_vec)
            .unwrap_or_default(),
        globals,
        envs,
        plugins: raw.plugins.unwrap_or_default(),
        rules: raw.rules.unwrap_or_default(),
        fix: raw.fix.unwrap_or(defaults.fix),
        ignore: raw.ignore.unwrap_or(defaults.ignore),
        ignore_path: raw.ignore_path,
        use_config_files: raw
            .use_config_files
            .or(raw.use_eslintrc)
            .unwrap_or(defaults.use_config_files),
    };

    Ok(LintOptions {
        quiet: raw.quiet.unwrap_or(false).into(),
        warn_file_ignored: raw.warn_file_ignored.unwrap_or(false),
        engine,
    })
}

/// `["jQuery", "$:true", "legacy:false"]`: a bare name is read-only.
fn parse_globals(list: Vec<String>) -> Result<BTreeMap<String, bool>, ConfigError> {
    list.into_iter()
        .map(|entry| {
            let (name, writable) = match entry.split_once(':') {
                None => (entry.as_str(), false),
                Some((name, "true")) => (name, true),
                Some((name, "false")) => (name, false),
                Some((_, other)) => {
                    return Err(ConfigError::InvalidOption {
                        option: "globals",
                        reason: format!(
                            "`{entry}` has writability `{other}`, expected true or false"
                        ),
                    });
                }
            };
            Ok((name.trim().to_string(), writable))
        })
        .collect()
}
