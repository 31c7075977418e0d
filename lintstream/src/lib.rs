//! # lintstream - Streaming Lint Pipeline
//!
//! `lintstream` lints a stream of files with a pluggable analysis engine and
//! lets callers chain actions over the results: per-file callbacks, a
//! whole-run summary, fail policies and reporters.
//!
//! Every entry point returns a [`Stage`]; stages compose with
//! [`Stage::pipe`] and run over any stream of [`SourceFile`]s.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lintstream::prelude::*;
//!
//! let pipeline = lint(build_engine, LintOptions::new().quiet(true))?
//!     .pipe(format_each("compact", "stderr")?)
//!     .pipe(fail_after_error());
//!
//! let files = run_to_end(pipeline, sources).await?;
//! ```
//!
//! ## Actions
//!
//! [`result`] and [`results`] accept an [`Action`] in one of three shapes:
//! a direct closure, a callback handed a [`Completion`], or a closure
//! returning a future. The first outcome an action reports is the one that
//! counts.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod aggregate;
mod dispatch;
mod linter;
mod options;
mod policy;
mod report;

pub use aggregate::ResultAggregator;
pub use dispatch::ResultDispatcher;
pub use linter::Linter;
pub use options::{LintOptions, Quiet, QuietFn};
pub use policy::{fail_after_error, fail_after_warning, fail_on_error, fail_on_warning};
pub use report::{format, format_each};

pub use lintstream_core::{
    // Actions
    Action,
    ActionError,
    // Errors
    BoxError,
    Completion,
    ConfigError,
    // Files
    Contents,
    // Engine
    Engine,
    EngineFactory,
    EngineOptions,
    FailureKind,
    LINT_ERROR,
    LINT_WARNING,
    // Results
    LintMessage,
    LintResult,
    LintedFile,
    // Stages
    Piped,
    PluginError,
    ResultSet,
    Severity,
    SourceFile,
    Stage,
    drive,
    invoke,
    run_to_end,
};

pub use lintstream_std::{
    BUILTIN_FORMATTERS, DEFAULT_FORMATTER, FormatFn, Formatter, FormatterRef, Sink, SinkRef,
    WriteFn,
};

/// Testing utilities.
pub mod testing {
    pub use lintstream_std::testing::{FIXTURE_CWD, RecordingSink, StubEngine, fixture_file};
}

/// The lint stage, with its engine built from `options` by `factory`.
///
/// Engine construction failures are reported here, before any file is read.
pub fn lint<F>(factory: F, options: LintOptions) -> Result<Linter<F::Engine>, ConfigError>
where
    F: EngineFactory,
{
    Linter::from_factory(&factory, options)
}

/// The lint stage around an already constructed engine.
pub fn lint_with<E: Engine>(engine: E, options: LintOptions) -> Linter<E> {
    Linter::new(engine, options)
}

/// Run `action` on every attached result, in file order.
pub fn result(action: Action<LintResult>) -> ResultDispatcher {
    ResultDispatcher::new(action)
}

/// Run `action` once on every result of the run, after the input ends.
pub fn results(action: Action<ResultSet>) -> ResultAggregator {
    ResultAggregator::new(action)
}

/// Prelude module - common imports for lintstream.
///
/// # Usage
///
/// ```rust,ignore
/// use lintstream::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Action, BoxError, Completion, Engine, LintMessage, LintOptions, LintResult, LintedFile,
        PluginError, ResultSet, SourceFile, Stage, drive, fail_after_error, fail_after_warning,
        fail_on_error, fail_on_warning, format, format_each, lint, lint_with, result, results,
        run_to_end,
    };
}
