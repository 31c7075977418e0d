//! # Action Invoker
//!
//! Runs a caller-supplied action against a single [`LintResult`] or a whole
//! [`ResultSet`] and folds every way the action can finish into one outcome.
//!
//! Actions come in three explicit shapes:
//!
//! 1. **Direct**: returns `Result<(), BoxError>` synchronously.
//! 2. **Callback**: receives a [`Completion`] handle and reports through it,
//!    possibly later and from another thread.
//! 3. **Deferred**: returns a future resolving to `Result<(), BoxError>`.
//!
//! A panic inside an action (or inside its future) counts as a failure.
//! Exactly one outcome is delivered per invocation: the first one observed.
//!
//! [`LintResult`]: crate::LintResult
//! [`ResultSet`]: crate::ResultSet

use crate::error::{ActionError, BoxError, PluginError};
use futures::{FutureExt, channel::oneshot, future::BoxFuture};
use std::{
    any::Any,
    fmt,
    future::Future,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, PoisonError},
};

type Outcome = Result<(), BoxError>;

type DirectFn<T> = dyn Fn(&T) -> Outcome + Send + Sync;
type CallbackFn<T> = dyn Fn(&T, Completion) + Send + Sync;
type DeferredFn<T> = dyn Fn(&T) -> BoxFuture<'static, Outcome> + Send + Sync;

/// A result-handling action over a payload `T`.
pub enum Action<T> {
    /// Completes when the call returns.
    Direct(Box<DirectFn<T>>),
    /// Completes when the [`Completion`] handle is settled.
    Callback(Box<CallbackFn<T>>),
    /// Completes when the returned future resolves.
    Deferred(Box<DeferredFn<T>>),
}

impl<T> Action<T> {
    /// An action that finishes synchronously.
    pub fn direct<F>(action: F) -> Self
    where
        F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Action::Direct(Box::new(action))
    }

    /// An action that reports through a completion handle.
    pub fn callback<F>(action: F) -> Self
    where
        F: Fn(&T, Completion) + Send + Sync + 'static,
    {
        Action::Callback(Box::new(action))
    }

    /// An action that returns a future.
    ///
    /// The future must own whatever it needs from the payload.
    pub fn deferred<F, Fut>(action: F) -> Self
    where
        F: Fn(&T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        Action::Deferred(Box::new(move |payload| action(payload).boxed()))
    }
}

impl<T> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Action::Direct(_) => "Direct",
            Action::Callback(_) => "Callback",
            Action::Deferred(_) => "Deferred",
        };
        f.debug_tuple("Action").field(&shape).finish()
    }
}

/// The continuation handed to callback-style actions.
///
/// Cloneable and `Send`; the first settle wins and later ones are ignored.
/// Dropping every handle without settling fails the action.
#[derive(Clone)]
pub struct Completion {
    slot: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

impl Completion {
    fn pair() -> (Self, oneshot::Receiver<Outcome>) {
        let (sender, receiver) = oneshot::channel();
        let completion = Self {
            slot: Arc::new(Mutex::new(Some(sender))),
        };
        (completion, receiver)
    }

    /// Report success.
    pub fn done(&self) {
        self.settle(Ok(()));
    }

    /// Report failure.
    pub fn fail(&self, err: impl Into<BoxError>) {
        self.settle(Err(err.into()));
    }

    /// Report an optional error; `None` means success.
    pub fn complete(&self, error: Option<BoxError>) {
        self.settle(error.map_or(Ok(()), Err));
    }

    /// Whether an outcome has already been reported.
    pub fn is_settled(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn settle(&self, outcome: Outcome) {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sender) = sender {
            // The invoker only drops the receiver once it has an outcome.
            let _ = sender.send(outcome);
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// Run `action` against `payload`.
///
/// Any failure is normalized into a [`PluginError`]; failures that already
/// are plugin errors keep their name and location.
pub async fn invoke<T>(action: &Action<T>, payload: &T) -> Result<(), PluginError>
where
    T: Sync,
{
    let outcome = match action {
        Action::Direct(run) => panic::catch_unwind(AssertUnwindSafe(|| run(payload)))
            .unwrap_or_else(|p| Err(panicked(p))),
        Action::Callback(run) => {
            let (completion, receiver) = Completion::pair();
            let handle = completion.clone();
            if let Err(p) = panic::catch_unwind(AssertUnwindSafe(|| run(payload, handle))) {
                completion.settle(Err(panicked(p)));
            }
            drop(completion);
            receiver
                .await
                .unwrap_or_else(|_| Err(Box::new(ActionError::Abandoned)))
        }
        Action::Deferred(run) => match panic::catch_unwind(AssertUnwindSafe(|| run(payload))) {
            Ok(future) => AssertUnwindSafe(future)
                .catch_unwind()
                .await
                .unwrap_or_else(|p| Err(panicked(p))),
            Err(p) => Err(panicked(p)),
        },
    };

    outcome.map_err(|err| {
        tracing::debug!(error = %err, "action failed");
        PluginError::from_action(err)
    })
}

fn panicked(payload: Box<dyn Any + Send>) -> BoxError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    Box::new(ActionError::Panicked(message))
}
