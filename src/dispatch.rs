//! Task-submission layer: adapts a context-plus-function request into a
//! pool submission with optional completion tracking.
//!
//! A [`Dispatcher`] carries an optional pool handle and an optional shared
//! completion latch. With no pool configured, both entry points run the
//! function synchronously on the caller's thread, so the same call sites
//! work with or without threading.

use crate::latch::CountLatch;
use crate::pool::{NoFreeSlot, SlotPool};
use std::sync::Arc;

/// Submission-side handle: where work goes and how completion is tracked.
#[derive(Clone)]
pub struct Dispatcher {
    pool: Option<Arc<SlotPool>>,
    tracker: Option<Arc<CountLatch>>,
}

/// Decrements the latch when dropped, so a wrapper balances its latch even
/// when the wrapped function panics out of it.
struct CompletionGuard(Arc<CountLatch>);

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

impl Dispatcher {
    /// A dispatcher with no pool: every submission runs inline.
    pub fn inline() -> Self {
        Self {
            pool: None,
            tracker: None,
        }
    }

    pub fn new(pool: Arc<SlotPool>) -> Self {
        Self {
            pool: Some(pool),
            tracker: None,
        }
    }

    /// Attaches a shared completion latch. Every subsequent
    /// [`fire_and_forget`](Self::fire_and_forget) increments it on
    /// submission and decrements it when the task finishes, so a caller
    /// can later `wait()` for a whole batch.
    pub fn with_tracker(mut self, tracker: Arc<CountLatch>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn pool(&self) -> Option<&Arc<SlotPool>> {
        self.pool.as_ref()
    }

    pub fn tracker(&self) -> Option<&Arc<CountLatch>> {
        self.tracker.as_ref()
    }

    /// Runs `function(context)` asynchronously on the pool, or inline when
    /// no pool is configured.
    ///
    /// The per-submission wrapper is a boxed closure owned by the pool
    /// task; it is dropped exactly once, after the function has run. The
    /// tracker (if any) is decremented through a guard that fires on
    /// return and on panic alike, so the latch balances even when the
    /// task panics. When the pool is saturated the wrapper is handed back
    /// and executed inline so the work is never lost.
    pub fn fire_and_forget<C, F>(&self, context: C, function: F)
    where
        C: Send + 'static,
        F: FnOnce(C) + Send + 'static,
    {
        let pool = match &self.pool {
            Some(pool) => pool,
            None => {
                function(context);
                return;
            }
        };

        let tracker = self.tracker.clone();
        if let Some(tracker) = &tracker {
            tracker.increment();
        }

        let wrapper = Box::new(move || {
            let _completion = tracker.map(CompletionGuard);
            function(context);
        });

        if let Err(NoFreeSlot(rejected)) = pool.submit(Some(wrapper)) {
            // all slots busy: degrade to the inline path
            if let Some(wrapper) = rejected {
                wrapper();
            }
        }
    }

    /// Runs `function(context)` and blocks until it has fully executed.
    ///
    /// Uses a dedicated single-shot latch per call, independent of any
    /// attached tracker, so the wait covers exactly this task. The latch
    /// is released on return and on panic alike; a panicking task is
    /// recorded by the pool's panic handler and the caller still returns.
    /// With no pool configured the function simply runs inline.
    pub fn submit_and_wait<C, F>(&self, context: C, function: F)
    where
        C: Send + 'static,
        F: FnOnce(C) + Send + 'static,
    {
        let pool = match &self.pool {
            Some(pool) => pool,
            None => {
                function(context);
                return;
            }
        };

        let done = Arc::new(CountLatch::new(1));
        let done2 = done.clone();

        let wrapper = Box::new(move || {
            let _completion = CompletionGuard(done2);
            function(context);
        });

        match pool.submit(Some(wrapper)) {
            Ok(_) => done.wait(),
            Err(NoFreeSlot(rejected)) => {
                if let Some(wrapper) = rejected {
                    wrapper();
                }
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pooled", &self.pool.is_some())
            .field("tracked", &self.tracker.is_some())
            .finish()
    }
}
