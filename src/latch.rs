//! Counting latch used for completion tracking and join barriers.

use parking_lot::{Condvar, Mutex};

/// Blocks waiters until an internal count reaches zero.
///
/// Serves two roles in the dispatch layer: a long-lived completion counter
/// shared across many fire-and-forget submissions, and a single-shot join
/// barrier created per submit-and-wait call. Its lock is private and
/// independent of every pool lock, so unrelated submitters can use
/// distinct latches concurrently.
pub struct CountLatch {
    count: Mutex<usize>,
    reached_zero: Condvar,
}

impl CountLatch {
    /// A latch that releases waiters after `count` decrements.
    pub fn new(count: usize) -> Self {
        Self {
            count: Mutex::new(count),
            reached_zero: Condvar::new(),
        }
    }

    pub fn increment(&self) {
        let mut count = self.count.lock();
        *count += 1;
    }

    /// Decrements the count, waking all waiters when it reaches zero.
    ///
    /// # Panics
    ///
    /// Panics if the count is already zero; a decrement must always be
    /// paired with the construction count or a prior increment.
    pub fn decrement(&self) {
        let mut count = self.count.lock();
        assert!(*count > 0, "latch decremented below zero");
        *count -= 1;
        if *count == 0 {
            self.reached_zero.notify_all();
        }
    }

    /// Blocks the calling thread until the count reaches zero. Returns
    /// immediately if it already has.
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.reached_zero.wait(&mut count);
        }
    }

    pub fn count(&self) -> usize {
        *self.count.lock()
    }
}

impl std::fmt::Debug for CountLatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountLatch").field("count", &self.count()).finish()
    }
}
