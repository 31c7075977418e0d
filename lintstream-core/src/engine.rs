//! The analysis-engine collaborator.
//!
//! The pipeline never implements lint rules itself. It builds one engine per
//! pipeline from [`EngineOptions`] and shares it, read-only, across every
//! file of the run.

use crate::{error::BoxError, result::LintResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A static-analysis engine.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a lint `Engine`",
    label = "missing `Engine` implementation",
    note = "Engines must implement `is_path_ignored` and `lint_text`."
)]
pub trait Engine: Send + Sync + 'static {
    /// Whether the engine's ignore rules exclude `relative_path`.
    fn is_path_ignored(&self, relative_path: &Path) -> bool;

    /// Analyze `source` as the file at `relative_path`.
    fn lint_text(&self, source: &str, relative_path: &Path) -> Result<LintResult, BoxError>;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn is_path_ignored(&self, relative_path: &Path) -> bool {
        (**self).is_path_ignored(relative_path)
    }

    fn lint_text(&self, source: &str, relative_path: &Path) -> Result<LintResult, BoxError> {
        (**self).lint_text(source, relative_path)
    }
}

impl<E: Engine + ?Sized> Engine for std::sync::Arc<E> {
    fn is_path_ignored(&self, relative_path: &Path) -> bool {
        (**self).is_path_ignored(relative_path)
    }

    fn lint_text(&self, source: &str, relative_path: &Path) -> Result<LintResult, BoxError> {
        (**self).lint_text(source, relative_path)
    }
}

/// Builds an [`Engine`] from passthrough options.
pub trait EngineFactory {
    /// The engine produced.
    type Engine: Engine;

    /// Construct the engine once for a pipeline run.
    fn build(&self, options: &EngineOptions) -> Result<Self::Engine, BoxError>;
}

impl<F, E> EngineFactory for F
where
    F: Fn(&EngineOptions) -> Result<E, BoxError>,
    E: Engine,
{
    type Engine = E;

    fn build(&self, options: &EngineOptions) -> Result<E, BoxError> {
        (self)(options)
    }
}

/// Options handed through to the engine untouched by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOptions {
    /// Explicit engine configuration file.
    pub config_file: Option<PathBuf>,
    /// Extra directories to load rules from.
    pub rule_paths: Vec<PathBuf>,
    /// Declared globals; `true` marks a global writable.
    pub globals: BTreeMap<String, bool>,
    /// Enabled environments.
    pub envs: Vec<String>,
    /// Engine plugins to load.
    pub plugins: Vec<String>,
    /// Rule settings, opaque to the pipeline.
    pub rules: BTreeMap<String, serde_json::Value>,
    /// Ask the engine to propose fixed contents.
    pub fix: bool,
    /// Honor ignore files and patterns.
    pub ignore: bool,
    /// Alternative ignore file.
    pub ignore_path: Option<PathBuf>,
    /// Look up configuration files next to linted files.
    pub use_config_files: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            config_file: None,
            rule_paths: Vec::new(),
            globals: BTreeMap::new(),
            envs: Vec::new(),
            plugins: Vec::new(),
            rules: BTreeMap::new(),
            fix: false,
            ignore: true,
            ignore_path: None,
            use_config_files: true,
        }
    }
}
