use crate::{error::Panicked, limiter::Permit, BoxError};
use futures_util::future::{BoxFuture, FutureExt};
use std::{
    fmt,
    future::IntoFuture,
    panic::{self, AssertUnwindSafe},
};
use tokio::sync::oneshot;
use tracing::Instrument;

/// Response sender
pub(crate) type Tx<T> = oneshot::Sender<Result<T, BoxError>>;

/// Response receiver
pub(crate) type Rx<T> = oneshot::Receiver<Result<T, BoxError>>;

/// A submitted work item, held in the queue until the limiter admits it.
///
/// Starting consumes the runner together with the [`Permit`] it was admitted
/// under. The permit is released before the outcome is sent, so a caller
/// woken by its response already observes the freed capacity.
pub(crate) struct Runner {
    start: Box<dyn FnOnce(Permit) -> BoxFuture<'static, ()> + Send>,
}

impl Runner {
    pub(crate) fn new<F, A, T, E>(work: F, tx: Tx<T>) -> Self
    where
        F: FnOnce() -> A + Send + 'static,
        A: IntoFuture<Output = Result<T, E>> + Send + 'static,
        A::IntoFuture: Send + 'static,
        T: Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        // Capture the submitter's span so that events emitted by the work
        // are attributed to it, not to whichever task admitted it.
        let span = tracing::Span::current();

        let start = move |permit: Permit| -> BoxFuture<'static, ()> {
            // The work is called here, on the dispatching thread, so items
            // start in the order they were admitted whatever order their
            // tasks are later polled in. A panic while building the future
            // is caught the same way as one while polling it.
            let started = {
                let _entered = span.enter();
                panic::catch_unwind(AssertUnwindSafe(|| work().into_future()))
            };

            async move {
                let outcome = match started {
                    Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                    Err(panic) => Err(panic),
                };

                let response = match outcome {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(error)) => Err(error.into()),
                    Err(panic) => {
                        let error = Panicked::new(panic);
                        tracing::debug!(%error, "work item panicked");
                        Err(error.into())
                    }
                };

                permit.release();

                if tx.send(response).is_err() {
                    tracing::trace!("response future dropped before work completed");
                }
            }
            .instrument(span)
            .boxed()
        };

        Runner {
            start: Box::new(start),
        }
    }

    /// Call the work under `permit` and return the future that completes it.
    pub(crate) fn start(self, permit: Permit) -> BoxFuture<'static, ()> {
        (self.start)(permit)
    }
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner").finish()
    }
}
