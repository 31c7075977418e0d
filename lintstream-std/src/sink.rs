//! Output sinks for rendered reports.

use lintstream_core::{BoxError, ConfigError};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Signature of a callable sink.
pub type WriteFn = dyn Fn(&str) -> Result<(), BoxError> + Send + Sync;

/// An unresolved sink: a stream name, any writer, or a callable.
pub enum SinkRef {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
    /// A stream name (`stdout`, `-`, `stderr`), resolved at construction.
    Named(String),
    /// Any byte writer.
    Writer(Box<dyn Write + Send>),
    /// A callable receiving the report text.
    Callback(Arc<WriteFn>),
}

impl SinkRef {
    /// Wrap a byte writer.
    pub fn writer<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        SinkRef::Writer(Box::new(writer))
    }

    /// Wrap a callable.
    pub fn callback<F>(write: F) -> Self
    where
        F: Fn(&str) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        SinkRef::Callback(Arc::new(write))
    }
}

impl Default for SinkRef {
    fn default() -> Self {
        SinkRef::Stdout
    }
}

impl From<&str> for SinkRef {
    fn from(name: &str) -> Self {
        SinkRef::Named(name.to_string())
    }
}

impl From<String> for SinkRef {
    fn from(name: String) -> Self {
        SinkRef::Named(name)
    }
}

impl fmt::Debug for SinkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkRef::Stdout => f.write_str("Stdout"),
            SinkRef::Stderr => f.write_str("Stderr"),
            SinkRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            SinkRef::Writer(_) => f.write_str("Writer"),
            SinkRef::Callback(_) => f.write_str("Callback"),
        }
    }
}

#[derive(Clone)]
enum Target {
    Stdout,
    Stderr,
    Writer(Arc<Mutex<Box<dyn Write + Send>>>),
    Callback(Arc<WriteFn>),
}

/// A resolved sink.
///
/// Stream targets receive the report with a trailing newline added when it
/// lacks one; callables receive the report text as rendered.
#[derive(Clone)]
pub struct Sink {
    target: Target,
}

impl Sink {
    /// Resolve a sink, failing on unknown stream names.
    pub fn resolve(sink: SinkRef) -> Result<Self, ConfigError> {
        let target = match sink {
            SinkRef::Stdout => Target::Stdout,
            SinkRef::Stderr => Target::Stderr,
            SinkRef::Named(name) => match name.as_str() {
                "stdout" | "-" => Target::Stdout,
                "stderr" => Target::Stderr,
                _ => return Err(ConfigError::UnknownSink(name)),
            },
            SinkRef::Writer(writer) => Target::Writer(Arc::new(Mutex::new(writer))),
            SinkRef::Callback(write) => Target::Callback(write),
        };
        Ok(Self { target })
    }

    /// Send one rendered report.
    pub fn write(&self, report: &str) -> Result<(), BoxError> {
        tracing::trace!(bytes = report.len(), "writing report");
        match &self.target {
            Target::Stdout => write_line(&mut io::stdout().lock(), report)?,
            Target::Stderr => write_line(&mut io::stderr().lock(), report)?,
            Target::Writer(writer) => {
                let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
                write_line(&mut *writer, report)?;
            }
            Target::Callback(write) => write(report)?,
        }
        Ok(())
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            Target::Stdout => "stdout",
            Target::Stderr => "stderr",
            Target::Writer(_) => "writer",
            Target::Callback(_) => "callback",
        };
        f.debug_struct("Sink").field("target", &target).finish()
    }
}

fn write_line<W: Write + ?Sized>(writer: &mut W, report: &str) -> io::Result<()> {
    writer.write_all(report.as_bytes())?;
    if !report.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_named_sinks() {
        assert!(Sink::resolve("stdout".into()).is_ok());
        assert!(Sink::resolve("-".into()).is_ok());
        assert!(Sink::resolve("stderr".into()).is_ok());
        let err = Sink::resolve("printer".into()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSink(name) if name == "printer"));
    }

    #[test]
    fn test_writer_appends_newline() {
        let buffer = SharedBuffer::default();
        let sink = Sink::resolve(SinkRef::writer(buffer.clone())).unwrap();
        sink.write("first").unwrap();
        sink.write("second\n").unwrap();
        assert_eq!(buffer.0.lock().unwrap().as_slice(), b"first\nsecond\n");
    }

    #[test]
    fn test_writer_errors_surface() {
        let sink = Sink::resolve(SinkRef::writer(BrokenWriter)).unwrap();
        let err = sink.write("report").unwrap_err();
        assert_eq!(err.to_string(), "reader went away");
    }

    #[test]
    fn test_callback_gets_raw_text() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let sink = Sink::resolve(SinkRef::callback(move |text| {
            captured.lock().unwrap().push(text.to_string());
            Ok(())
        }))
        .unwrap();
        sink.write("no newline").unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["no newline".to_string()]);
    }
}
