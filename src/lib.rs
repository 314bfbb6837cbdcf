#![doc(html_root_url = "https://docs.rs/tower-fifo-limit/0.1.0")]
#![warn(
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub
)]

//! Limit the number of asynchronous work items running at once.
//!
//! A [`Limiter`] accepts an unbounded stream of work. At most
//! [`Concurrency`] items are active at any time; everything else waits in a
//! first-in, first-out [`Queue`](queue::Queue) and is admitted as soon as an
//! active item finishes, whether it finished with a value, an error or a
//! panic.
//!
//! ```
//! use tower_fifo_limit::{BoxError, Limiter};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), BoxError> {
//! let limiter = Limiter::new(2)?;
//!
//! let responses: Vec<_> = (0..6)
//!     .map(|i| limiter.schedule(move || async move { Ok::<_, BoxError>(i * 2) }))
//!     .collect();
//!
//! let mut doubled = Vec::new();
//! for response in responses {
//!     doubled.push(response.await?);
//! }
//! assert_eq!(doubled, [0, 2, 4, 6, 8, 10]);
//! # Ok(())
//! # }
//! ```
//!
//! Submission never blocks. The returned [`ResponseFuture`] settles exactly
//! once, and the work runs whether or not that future is polled.
//!
//! The same limiter can sit in front of a tower [`Service`] through
//! [`FifoLimit`], [`FifoLimitLayer`] and [`SharedFifoLimitLayer`].
//!
//! [`ResponseFuture`]: future::ResponseFuture
//! [`Service`]: tower_service::Service

pub mod concurrency;
pub mod error;
pub mod future;
mod layer;
mod limiter;
pub mod queue;
mod runner;
mod service;

pub use crate::concurrency::Concurrency;
pub use crate::layer::{FifoLimitLayer, SharedFifoLimitLayer};
pub use crate::limiter::Limiter;
pub use crate::service::FifoLimit;

/// Alias for a type-erased error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
