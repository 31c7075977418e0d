//! # Pipeline Stages
//!
//! A [`Stage`] consumes one item at a time and produces one item, with an
//! optional end-of-stream hook. Stages compose with [`Stage::pipe`] and are
//! driven over an input stream with [`drive`].
//!
//! # Flow Model
//!
//! - **Sequential**: the next item is only pulled after the current one has
//!   passed through every piped stage. Nothing is buffered in between.
//! - **Fail-fast**: the first error ends the run; later items are never
//!   pulled and `flush` is never called.
//! - **Finalization**: once the input is exhausted, `flush` runs exactly once,
//!   upstream stages before downstream ones.

use crate::error::PluginError;
use futures::{
    Stream, StreamExt, TryStreamExt,
    stream::{self, BoxStream},
};
use std::future::Future;

/// One step of a lint pipeline.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a pipeline `Stage` for `{In}`",
    label = "missing `Stage<{In}>` implementation",
    note = "Stages must implement `transform` for the item type `{In}`."
)]
pub trait Stage<In>: Send {
    /// The item type passed downstream.
    type Output: Send;

    /// Process a single item.
    fn transform(
        &mut self,
        item: In,
    ) -> impl Future<Output = Result<Self::Output, PluginError>> + Send;

    /// Called once after the last item, unless the run already failed.
    fn flush(&mut self) -> impl Future<Output = Result<(), PluginError>> + Send {
        async { Ok(()) }
    }

    /// Feeds every output of this stage into `next`.
    fn pipe<Next>(self, next: Next) -> Piped<Self, Next>
    where
        Self: Sized,
        Next: Stage<Self::Output>,
    {
        Piped {
            first: self,
            second: next,
        }
    }

    /// Drives this stage over `input`; see [`drive`].
    fn run<St>(self, input: St) -> impl Stream<Item = Result<Self::Output, PluginError>> + Send
    where
        Self: Sized + 'static,
        In: Send + 'static,
        St: Stream<Item = In> + Send + 'static,
    {
        drive(self, input)
    }
}

/// Two stages run back to back.
#[derive(Debug)]
pub struct Piped<A, B> {
    first: A,
    second: B,
}

impl<In, A, B> Stage<In> for Piped<A, B>
where
    In: Send,
    A: Stage<In>,
    B: Stage<A::Output>,
{
    type Output = B::Output;

    async fn transform(&mut self, item: In) -> Result<Self::Output, PluginError> {
        let intermediate = self.first.transform(item).await?;
        self.second.transform(intermediate).await
    }

    async fn flush(&mut self) -> Result<(), PluginError> {
        self.first.flush().await?;
        self.second.flush().await
    }
}

enum DriveState<S, In> {
    Running(S, BoxStream<'static, In>),
    Done,
}

/// Pull `input` through `stage` one item at a time.
///
/// The returned stream yields every transformed item. On the first error it
/// yields that error and ends. When the input is exhausted it flushes the
/// stage and yields the flush error, if any, as its last item.
pub fn drive<In, S, St>(
    stage: S,
    input: St,
) -> impl Stream<Item = Result<S::Output, PluginError>> + Send
where
    In: Send + 'static,
    S: Stage<In> + 'static,
    St: Stream<Item = In> + Send + 'static,
{
    stream::unfold(
        DriveState::Running(stage, input.boxed()),
        |state| async move {
            let DriveState::Running(mut stage, mut input) = state else {
                return None;
            };
            match input.next().await {
                Some(item) => match stage.transform(item).await {
                    Ok(output) => Some((Ok(output), DriveState::Running(stage, input))),
                    Err(err) => {
                        tracing::debug!(error = %err, "stage failed; ending run");
                        Some((Err(err), DriveState::Done))
                    }
                },
                None => {
                    tracing::trace!("input exhausted; flushing stages");
                    match stage.flush().await {
                        Ok(()) => None,
                        Err(err) => Some((Err(err), DriveState::Done)),
                    }
                }
            }
        },
    )
}

/// Drive `stage` over every item of `input` and collect the outputs.
pub async fn run_to_end<In, S, I>(stage: S, input: I) -> Result<Vec<S::Output>, PluginError>
where
    In: Send + 'static,
    S: Stage<In> + 'static,
    I: IntoIterator<Item = In>,
    I::IntoIter: Send + 'static,
{
    drive(stage, stream::iter(input)).try_collect().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use std::sync::{Arc, Mutex};

    struct Double;

    impl Stage<u32> for Double {
        type Output = u32;

        async fn transform(&mut self, item: u32) -> Result<u32, PluginError> {
            Ok(item * 2)
        }
    }

    struct Recorder {
        log: Arc<Mutex<Vec<String>>>,
        fail_on: Option<u32>,
        fail_flush: bool,
    }

    impl Recorder {
        fn new(log: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                log: log.clone(),
                fail_on: None,
                fail_flush: false,
            }
        }
    }

    impl Stage<u32> for Recorder {
        type Output = u32;

        async fn transform(&mut self, item: u32) -> Result<u32, PluginError> {
            self.log.lock().unwrap().push(format!("item {item}"));
            if self.fail_on == Some(item) {
                return Err(PluginError::new(FailureKind::Action, format!("rejected {item}")));
            }
            Ok(item)
        }

        async fn flush(&mut self) -> Result<(), PluginError> {
            self.log.lock().unwrap().push("flush".into());
            if self.fail_flush {
                return Err(PluginError::new(FailureKind::Policy, "flush failed"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_pipe_runs_in_order_then_flushes() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stage = Double.pipe(Recorder::new(&log));

        let out = run_to_end(stage, vec![1, 2, 3]).await.unwrap();
        assert_eq!(out, vec![2, 4, 6]);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["item 2", "item 4", "item 6", "flush"]
        );
    }

    #[tokio::test]
    async fn test_first_error_stops_the_run() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut recorder = Recorder::new(&log);
        recorder.fail_on = Some(2);

        let items: Vec<_> = drive(recorder, stream::iter(vec![1, 2, 3])).collect().await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert_eq!(items[1].as_ref().unwrap_err().message(), "rejected 2");
        // Item 3 is never pulled and flush never runs.
        assert_eq!(*log.lock().unwrap(), vec!["item 1", "item 2"]);
    }

    #[tokio::test]
    async fn test_flush_error_is_last_item() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut recorder = Recorder::new(&log);
        recorder.fail_flush = true;

        let items: Vec<_> = recorder.run(stream::iter(vec![5, 6])).collect().await;
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].as_ref().unwrap_err().kind(), FailureKind::Policy);
    }

    #[tokio::test]
    async fn test_upstream_flush_failure_skips_downstream_flush() {
        let upstream_log = Arc::new(Mutex::new(Vec::new()));
        let downstream_log = Arc::new(Mutex::new(Vec::new()));
        let mut upstream = Recorder::new(&upstream_log);
        upstream.fail_flush = true;

        let result = run_to_end(upstream.pipe(Recorder::new(&downstream_log)), vec![1]).await;
        assert!(result.is_err());
        assert_eq!(*downstream_log.lock().unwrap(), vec!["item 1"]);
    }

    #[tokio::test]
    async fn test_empty_input_still_flushes() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let out = run_to_end(Recorder::new(&log), Vec::<u32>::new()).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["flush"]);
    }
}
