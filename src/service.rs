use crate::{future::ResponseFuture, limiter::Limiter, BoxError};
use std::{
    future::poll_fn,
    task::{Context, Poll},
};
use tower_service::Service;

/// Routes every request to the inner service through a [`Limiter`].
///
/// `FifoLimit` is always ready: instead of applying backpressure it queues
/// requests and forwards them, oldest first, as the limiter frees capacity.
/// Each admitted request is sent to a clone of the inner service, which is
/// driven to readiness before it is called.
#[derive(Debug, Clone)]
pub struct FifoLimit<S> {
    inner: S,
    limiter: Limiter,
}

impl<S> FifoLimit<S> {
    /// Create a new service that admits requests to `inner` through `limiter`.
    pub fn new(inner: S, limiter: Limiter) -> Self {
        FifoLimit { inner, limiter }
    }

    /// Get a reference to the limiter requests are queued on.
    pub fn limiter(&self) -> &Limiter {
        &self.limiter
    }

    /// Get a reference to the inner service
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Get a mutable reference to the inner service
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume `self`, returning the inner service
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, Request> Service<Request> for FifoLimit<S>
where
    S: Service<Request> + Clone + Send + 'static,
    S::Response: Send + 'static,
    S::Error: Into<BoxError> + Send + 'static,
    S::Future: Send + 'static,
    Request: Send + 'static,
{
    type Response = S::Response;
    type Error = BoxError;
    type Future = ResponseFuture<S::Response>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let mut inner = self.inner.clone();

        self.limiter.schedule(move || async move {
            match poll_fn(|cx| inner.poll_ready(cx)).await {
                Ok(()) => inner.call(request).await,
                Err(error) => Err(error),
            }
        })
    }
}
