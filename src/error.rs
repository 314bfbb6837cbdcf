//! Error types

use std::{any::Any, fmt};

/// Error returned when a concurrency bound is neither a positive integer nor
/// unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidConcurrency {
    value: String,
}

/// Error returned by a [`ResponseFuture`] whose work item was discarded
/// before it started, for example by [`Limiter::clear_queue`].
///
/// [`ResponseFuture`]: crate::future::ResponseFuture
/// [`Limiter::clear_queue`]: crate::Limiter::clear_queue
pub struct Cancelled {
    _p: (),
}

/// Error returned by a [`ResponseFuture`] whose work item panicked, either
/// while producing its future or while that future was polled.
///
/// [`ResponseFuture`]: crate::future::ResponseFuture
#[derive(Debug)]
pub struct Panicked {
    message: Option<String>,
}

// ===== impl InvalidConcurrency =====

impl InvalidConcurrency {
    pub(crate) fn new(value: impl fmt::Display) -> Self {
        InvalidConcurrency {
            value: value.to_string(),
        }
    }

    /// The rejected value, as it was written.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for InvalidConcurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected concurrency to be a number from 1 and up or unbounded, got {}",
            self.value
        )
    }
}

impl std::error::Error for InvalidConcurrency {}

// ===== impl Cancelled =====

impl Cancelled {
    pub(crate) fn new() -> Self {
        Cancelled { _p: () }
    }
}

impl fmt::Debug for Cancelled {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_tuple("Cancelled").finish()
    }
}

impl fmt::Display for Cancelled {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str("work item was removed from the queue before it started")
    }
}

impl std::error::Error for Cancelled {}

// ===== impl Panicked =====

impl Panicked {
    pub(crate) fn new(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => Some(*message),
            Err(payload) => payload.downcast_ref::<&str>().map(|s| s.to_string()),
        };
        Panicked { message }
    }

    /// The panic message, if the work item panicked with a string.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for Panicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message {
            Some(ref message) => write!(f, "work item panicked: {}", message),
            None => f.pad("work item panicked"),
        }
    }
}

impl std::error::Error for Panicked {}
