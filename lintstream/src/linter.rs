//! The per-file lint stage.

use crate::options::LintOptions;
use lintstream_core::{
    ConfigError, Contents, Engine, EngineFactory, LintResult, LintedFile, PluginError, SourceFile,
    Stage,
};
use tracing::{debug, trace};

/// Lints every buffered file with one engine and attaches its result.
///
/// The engine is built once and shared by every file of the run. Per file:
///
/// 1. Files without contents pass through with no result.
/// 2. Streaming contents fail the run.
/// 3. Files the engine ignores pass through, carrying a warning result only
///    when [`LintOptions::warn_file_ignored`] is set and ignoring is enabled.
/// 4. Otherwise the engine result is quiet-filtered, a proposed fix replaces
///    the contents, and the result is attached.
#[derive(Debug)]
pub struct Linter<E> {
    engine: E,
    options: LintOptions,
}

impl<E: Engine> Linter<E> {
    /// Wrap an already constructed engine.
    pub fn new(engine: E, options: LintOptions) -> Self {
        Self { engine, options }
    }

    /// Build the engine from `options` and wrap it.
    pub fn from_factory<F>(factory: &F, options: LintOptions) -> Result<Self, ConfigError>
    where
        F: EngineFactory<Engine = E> + ?Sized,
    {
        let engine = factory
            .build(&options.engine)
            .map_err(ConfigError::Engine)?;
        Ok(Self::new(engine, options))
    }

    /// The shared engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The options this stage was built with.
    pub fn options(&self) -> &LintOptions {
        &self.options
    }

    /// Lint a single file.
    pub fn lint_file(&self, mut file: SourceFile) -> Result<LintedFile, PluginError> {
        if file.is_null() {
            trace!(path = %file.path().display(), "no contents; passing through");
            return Ok(LintedFile::bare(file));
        }
        if file.is_stream() {
            return Err(PluginError::streaming_not_supported(file.path()));
        }

        let relative = file.relative_path();
        if self.engine.is_path_ignored(&relative) {
            debug!(path = %relative.display(), "file ignored by engine");
            let warn = self.options.warn_file_ignored && self.options.engine.ignore;
            let result = warn.then(|| LintResult::ignored(file.path()));
            return Ok(LintedFile::new(file, result));
        }

        let mut result = match file.text() {
            Some(source) => self
                .engine
                .lint_text(&source, &relative)
                .map_err(|err| PluginError::engine(file.path(), err))?,
            None => return Ok(LintedFile::bare(file)),
        };

        self.options.quiet.apply(&mut result);

        if let Some(output) = &result.output {
            debug!(path = %relative.display(), "applying fixed output");
            file.set_contents(Contents::Buffer(output.clone().into_bytes()));
            result.fixed = true;
        }

        debug!(
            path = %relative.display(),
            errors = result.error_count(),
            warnings = result.warning_count(),
            fixed = result.fixed,
            "file linted"
        );
        Ok(LintedFile::new(file, Some(result)))
    }
}

impl<E: Engine> Stage<SourceFile> for Linter<E> {
    type Output = LintedFile;

    async fn transform(&mut self, file: SourceFile) -> Result<LintedFile, PluginError> {
        self.lint_file(file)
    }
}
