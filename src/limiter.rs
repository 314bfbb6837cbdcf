use crate::{
    concurrency::Concurrency,
    error::InvalidConcurrency,
    future::ResponseFuture,
    queue::Queue,
    runner::Runner,
    BoxError,
};
use std::{
    future::{self, IntoFuture},
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::{runtime::Handle, sync::oneshot};

/// Runs submitted work with at most a fixed number of items active at once.
///
/// Work that cannot start immediately waits in a first-in, first-out queue.
/// Whenever an active item completes, successfully or not, its capacity is
/// released and the oldest queued item is admitted in its place.
///
/// `Limiter` is a handle: clones share the same bound, queue and counters.
/// Separate limiters are fully independent.
#[derive(Debug, Clone)]
pub struct Limiter {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    concurrency: Concurrency,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    active: usize,
    pending: Queue<Runner>,
}

/// One unit of admitted capacity.
///
/// [`Permit::release`] frees the capacity and admits the next queued item.
/// A permit dropped without being released belongs to work that was torn
/// down before completing, which only happens while the runtime shuts down;
/// it frees the capacity but leaves queued work where it is.
#[derive(Debug)]
pub(crate) struct Permit {
    shared: Arc<Shared>,
    released: bool,
}

// ===== impl Limiter =====

impl Limiter {
    /// Create a limiter that runs at most `max` items at once.
    ///
    /// Returns an error if `max` is zero.
    pub fn new(max: usize) -> Result<Self, InvalidConcurrency> {
        Concurrency::new(max).map(Self::with_concurrency)
    }

    /// Create a limiter that admits every item as soon as it is dispatched.
    pub fn unbounded() -> Self {
        Self::with_concurrency(Concurrency::Unbounded)
    }

    /// Create a limiter enforcing an already validated bound.
    pub fn with_concurrency(concurrency: Concurrency) -> Self {
        Limiter {
            shared: Arc::new(Shared {
                concurrency,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// The bound this limiter enforces.
    pub fn concurrency(&self) -> Concurrency {
        self.shared.concurrency
    }

    /// Queue `work` and return a future for its outcome.
    ///
    /// `work` is called once the limiter admits it. It may return anything
    /// that converts into a future resolving to `Result<T, E>`: an `async`
    /// block, a boxed future, or a custom [`IntoFuture`] type. If it returns
    /// an error or panics, only the returned future fails; the capacity it
    /// held is released and queued work continues.
    ///
    /// The item is counted as pending as soon as this returns. Admission is
    /// deferred to a spawned dispatch task, so a batch of synchronous
    /// submissions is queued in call order before any of it starts.
    ///
    /// Dropping the returned future does not cancel the work.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime. Nothing is queued in
    /// that case.
    pub fn schedule<F, A, T, E>(&self, work: F) -> ResponseFuture<T>
    where
        F: FnOnce() -> A + Send + 'static,
        A: IntoFuture<Output = Result<T, E>> + Send + 'static,
        A::IntoFuture: Send + 'static,
        T: Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        // Fails before anything is queued when there is no runtime to
        // dispatch on.
        let handle = Handle::current();
        let (tx, rx) = oneshot::channel();

        {
            let mut state = self.shared.lock();
            state.pending.enqueue(Runner::new(work, tx));
            tracing::trace!(pending = state.pending.len(), "work item queued");
        }

        let shared = self.shared.clone();
        handle.spawn(async move { shared.dispatch() });

        ResponseFuture::new(rx)
    }

    /// Queue a synchronous `work` closure.
    ///
    /// This behaves exactly like [`schedule`](Limiter::schedule); the value
    /// `work` returns is wrapped in an already completed future.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn schedule_fn<F, T, E>(&self, work: F) -> ResponseFuture<T>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        self.schedule(move || future::ready(work()))
    }

    /// Number of items currently running.
    pub fn active_count(&self) -> usize {
        self.shared.lock().active
    }

    /// Number of items queued but not yet started.
    pub fn pending_count(&self) -> usize {
        self.shared.lock().pending.len()
    }

    /// Discard every queued item that has not started yet.
    ///
    /// Discarded work never runs and its [`ResponseFuture`] resolves to
    /// [`Cancelled`](crate::error::Cancelled). Items that are already active
    /// are unaffected.
    pub fn clear_queue(&self) {
        let mut cleared = Queue::new();
        mem::swap(&mut self.shared.lock().pending, &mut cleared);

        tracing::debug!(cleared = cleared.len(), "clearing pending work");

        // Runners own user closures, so drop them outside of the lock.
        cleared.clear();
    }
}

// ===== impl Shared =====

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        // The lock is never held while user code runs.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit queued runners until the bound is reached or the queue is empty.
    fn dispatch(self: &Arc<Self>) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::debug!("no runtime available; leaving queued work pending");
                return;
            }
        };

        loop {
            let runner = {
                let mut state = self.lock();

                if !self.concurrency.admits(state.active) {
                    tracing::trace!(
                        active = state.active,
                        pending = state.pending.len(),
                        "at capacity"
                    );
                    return;
                }

                match state.pending.dequeue() {
                    Some(runner) => {
                        state.active += 1;
                        tracing::trace!(
                            active = state.active,
                            pending = state.pending.len(),
                            "admitting work item"
                        );
                        runner
                    }
                    None => return,
                }
            };

            let permit = Permit {
                shared: self.clone(),
                released: false,
            };
            handle.spawn(runner.start(permit));
        }
    }

    fn finish(&self) -> usize {
        let mut state = self.lock();
        debug_assert!(state.active > 0, "released more permits than admitted");
        state.active -= 1;
        state.active
    }
}

// ===== impl Permit =====

impl Permit {
    pub(crate) fn release(mut self) {
        self.released = true;
        let active = self.shared.finish();
        tracing::trace!(active, "work item completed");
        self.shared.dispatch();
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        if !self.released {
            let active = self.shared.finish();
            tracing::debug!(active, "work item dropped before completing");
        }
    }
}
