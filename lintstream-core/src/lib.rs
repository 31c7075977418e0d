//! # lintstream-core
//!
//! Core types and traits for the lintstream result-action pipeline.
//!
//! This crate has minimal dependencies and is meant to be imported by engine
//! adapters, formatters and custom stages that don't need the full
//! `lintstream` pipeline.
//!
//! # Building Blocks
//!
//! ## Data model
//!
//! A [`SourceFile`] enters the pipeline. The lint stage pairs it with an
//! optional [`LintResult`] as a [`LintedFile`]. Aggregating stages collect
//! results into a [`ResultSet`].
//!
//! ## Collaborators
//!
//! The analysis itself is delegated to an [`Engine`], built once per run by
//! an [`EngineFactory`] from [`EngineOptions`].
//!
//! ## Action Invoker
//!
//! [`Action`] is a caller-supplied handler in one of three shapes (direct,
//! callback, deferred). [`invoke`] runs any of them and reports a single
//! outcome.
//!
//! ## Stages
//!
//! A [`Stage`] transforms one item at a time and may finalize at
//! end-of-stream. Stages chain with [`Stage::pipe`]; [`drive`] runs a chain
//! over a stream of files.
//!
//! # Error Types
//!
//! - [`ConfigError`] - Construction-time failures
//! - [`PluginError`] - The single failure surfaced by a running pipeline
//! - [`ActionError`] - Invoker-specific failure modes

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod action;
mod engine;
mod error;
mod file;
mod result;
mod stage;

// Re-exports
pub use action::{Action, Completion, invoke};
pub use engine::{Engine, EngineFactory, EngineOptions};
pub use error::{
    ActionError, BoxError, ConfigError, FailureKind, LINT_ERROR, LINT_WARNING, PluginError,
};
pub use file::{Contents, LintedFile, SourceFile};
pub use result::{LintMessage, LintResult, ResultSet, Severity};
pub use stage::{Piped, Stage, drive, run_to_end};
