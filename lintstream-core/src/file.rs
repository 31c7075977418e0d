//! In-flight file objects.
//!
//! A [`SourceFile`] is what enters the pipeline; the lint stage turns it into
//! a [`LintedFile`], which pairs the file with its optional [`LintResult`]
//! instead of annotating the file in place.

use crate::result::LintResult;
use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Contents of a file travelling through the pipeline.
pub enum Contents {
    /// No contents (e.g. a directory entry); passed through untouched.
    Null,
    /// Fully buffered contents.
    Buffer(Vec<u8>),
    /// Streaming contents, which the lint stage rejects.
    Stream(Box<dyn Read + Send + Sync>),
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Null => f.write_str("Null"),
            Contents::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            Contents::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// A file object: absolute path, working-directory context, contents.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    cwd: PathBuf,
    contents: Contents,
}

impl SourceFile {
    /// A file at the absolute `path`, seen from `cwd`.
    pub fn new(path: impl Into<PathBuf>, cwd: impl Into<PathBuf>, contents: Contents) -> Self {
        Self {
            path: path.into(),
            cwd: cwd.into(),
            contents,
        }
    }

    /// A file with buffered contents.
    pub fn buffered(
        path: impl Into<PathBuf>,
        cwd: impl Into<PathBuf>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self::new(path, cwd, Contents::Buffer(contents.into()))
    }

    /// A file without contents.
    pub fn null(path: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self::new(path, cwd, Contents::Null)
    }

    /// The absolute path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The working directory the file was read from.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The path relative to the file's own working directory.
    ///
    /// Engine ignore matching is anchored to this path, not to the process
    /// working directory. Falls back to the absolute path when no relative
    /// form exists.
    pub fn relative_path(&self) -> PathBuf {
        pathdiff::diff_paths(&self.path, &self.cwd).unwrap_or_else(|| self.path.clone())
    }

    /// Whether the file has no contents.
    pub fn is_null(&self) -> bool {
        matches!(self.contents, Contents::Null)
    }

    /// Whether the contents are streaming.
    pub fn is_stream(&self) -> bool {
        matches!(self.contents, Contents::Stream(_))
    }

    /// The raw contents.
    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    /// Buffered contents, if the file has any.
    pub fn buffer(&self) -> Option<&[u8]> {
        match &self.contents {
            Contents::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Buffered contents decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.buffer().map(String::from_utf8_lossy)
    }

    /// Replace the contents; path and cwd never change.
    pub fn set_contents(&mut self, contents: Contents) {
        self.contents = contents;
    }
}

/// A file paired with the result the lint stage attached to it.
#[derive(Debug)]
pub struct LintedFile {
    /// The file, possibly with fixed contents.
    pub file: SourceFile,
    /// The attached result, if the file was linted or flagged.
    pub result: Option<LintResult>,
}

impl LintedFile {
    /// Pair a file with its result.
    pub fn new(file: SourceFile, result: Option<LintResult>) -> Self {
        Self { file, result }
    }

    /// A file that carries no result.
    pub fn bare(file: SourceFile) -> Self {
        Self::new(file, None)
    }

    /// The attached result.
    pub fn result(&self) -> Option<&LintResult> {
        self.result.as_ref()
    }

    /// Split into the file and its result.
    pub fn into_parts(self) -> (SourceFile, Option<LintResult>) {
        (self.file, self.result)
    }
}
