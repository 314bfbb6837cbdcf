use crate::{concurrency::Concurrency, limiter::Limiter, service::FifoLimit};
use tower_layer::Layer;

/// Queues requests to the underlying service, running at most a fixed number
/// at a time in the order they arrived.
///
/// Each layered service gets its own [`Limiter`].
#[derive(Debug, Clone)]
pub struct FifoLimitLayer {
    concurrency: Concurrency,
}

impl FifoLimitLayer {
    /// Create a new FIFO limit layer.
    pub fn new(concurrency: Concurrency) -> Self {
        FifoLimitLayer { concurrency }
    }
}

impl<S> Layer<S> for FifoLimitLayer {
    type Service = FifoLimit<S>;

    fn layer(&self, service: S) -> Self::Service {
        FifoLimit::new(service, Limiter::with_concurrency(self.concurrency))
    }
}

/// Queues requests to the underlying service on a [`Limiter`] shared by every
/// service this layer wraps.
///
/// Requests to all of those services count against one bound and are
/// admitted from one queue.
#[derive(Debug, Clone)]
pub struct SharedFifoLimitLayer {
    limiter: Limiter,
}

impl SharedFifoLimitLayer {
    /// Create a new `SharedFifoLimitLayer`.
    pub fn new(limiter: Limiter) -> Self {
        SharedFifoLimitLayer { limiter }
    }
}

impl<S> Layer<S> for SharedFifoLimitLayer {
    type Service = FifoLimit<S>;

    fn layer(&self, service: S) -> Self::Service {
        FifoLimit::new(service, self.limiter.clone())
    }
}
