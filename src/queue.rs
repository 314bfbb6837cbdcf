//! A first-in, first-out buffer of pending work.

use std::collections::VecDeque;

/// An ordered buffer that hands entries back in the order they were added.
///
/// `Queue` does no synchronization of its own; a [`Limiter`] keeps its queue
/// behind the same lock as its active count.
///
/// [`Limiter`]: crate::Limiter
#[derive(Debug)]
pub struct Queue<T> {
    entries: VecDeque<T>,
}

impl<T> Queue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Queue {
            entries: VecDeque::new(),
        }
    }

    /// Append `entry` to the tail of the queue.
    pub fn enqueue(&mut self, entry: T) {
        self.entries.push_back(entry);
    }

    /// Remove and return the entry at the head of the queue, or `None` if
    /// the queue is empty.
    pub fn dequeue(&mut self) -> Option<T> {
        self.entries.pop_front()
    }

    /// Number of entries currently queued.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every queued entry without handing it out.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Queue::new()
    }
}
