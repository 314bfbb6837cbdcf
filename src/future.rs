//! Future types

use crate::{error::Cancelled, runner::Rx, BoxError};
use futures_core::ready;
use pin_project_lite::pin_project;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

pin_project! {
    /// Future that completes when a scheduled work item has run.
    ///
    /// Resolves to the item's value or error. If the item was discarded
    /// before it started, resolves to [`Cancelled`].
    #[derive(Debug)]
    pub struct ResponseFuture<T> {
        #[pin]
        rx: Rx<T>,
    }
}

impl<T> ResponseFuture<T> {
    pub(crate) fn new(rx: Rx<T>) -> Self {
        ResponseFuture { rx }
    }
}

impl<T> Future for ResponseFuture<T> {
    type Output = Result<T, BoxError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match ready!(self.project().rx.poll(cx)) {
            Ok(response) => Poll::Ready(response),
            // The runner was dropped without sending, so it never ran.
            Err(_) => Poll::Ready(Err(Cancelled::new().into())),
        }
    }
}
