//! Report stages: render results with a formatter and write them to a sink.

use crate::aggregate::ResultAggregator;
use crate::dispatch::ResultDispatcher;
use lintstream_core::{Action, BoxError, ConfigError, LintResult, ResultSet};
use lintstream_std::{Formatter, FormatterRef, Sink, SinkRef};
use tracing::trace;

/// Report each result as its file passes by.
///
/// The formatter and sink are resolved here, so unknown names fail before
/// any file is read.
pub fn format_each(
    formatter: impl Into<FormatterRef>,
    sink: impl Into<SinkRef>,
) -> Result<ResultDispatcher, ConfigError> {
    let formatter = Formatter::resolve(formatter.into())?;
    let sink = Sink::resolve(sink.into())?;
    Ok(ResultDispatcher::new(Action::direct(
        move |result: &LintResult| write_report(&formatter, &sink, std::slice::from_ref(result)),
    )))
}

/// Report every result at once after the input ends.
///
/// Nothing is written when the run produced no results.
pub fn format(
    formatter: impl Into<FormatterRef>,
    sink: impl Into<SinkRef>,
) -> Result<ResultAggregator, ConfigError> {
    let formatter = Formatter::resolve(formatter.into())?;
    let sink = Sink::resolve(sink.into())?;
    Ok(ResultAggregator::new(Action::direct(
        move |results: &ResultSet| {
            if results.is_empty() {
                trace!("no results; skipping report");
                return Ok(());
            }
            write_report(&formatter, &sink, results.results())
        },
    )))
}

fn write_report(
    formatter: &Formatter,
    sink: &Sink,
    results: &[LintResult],
) -> Result<(), BoxError> {
    let report = formatter.render(results)?;
    if report.is_empty() {
        trace!(formatter = formatter.name(), "empty report; nothing to write");
        return Ok(());
    }
    sink.write(&report)
}
