//! # lintstream-std
//!
//! Standard collaborators for the lintstream pipeline.
//!
//! This crate provides:
//! - **Formatters**: [`Formatter`] resolution and the built-in `stylish`,
//!   `compact`, `unix` and `json` renderers
//! - **Sinks**: [`Sink`] resolution for standard streams, writers and callables
//! - **Testing**: stub engine and recording sink in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use lintstream_core;

// Modules
pub mod format;
pub mod sink;
pub mod testing;

pub use format::{BUILTIN_FORMATTERS, DEFAULT_FORMATTER, FormatFn, Formatter, FormatterRef};
pub use sink::{Sink, SinkRef, WriteFn};
