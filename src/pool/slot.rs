//! Fixed task slots and the occupancy protocol.
//!
//! A slot is a reusable unit of pool capacity holding at most one task at a
//! time. Its occupancy marker is zero while free and carries the submitting
//! thread's identity while busy; the worker assigned to the slot blocks on
//! the slot's own condvar until the marker becomes non-zero.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// The work-item contract: one opaque call, no return value, no error
/// channel. The submitter's context lives in the closure's captured state.
pub type TaskFn = Box<dyn FnOnce() + Send + 'static>;

/// Marker value of a free slot.
pub const FREE: u64 = 0;

struct SlotState {
    routine: Option<TaskFn>,
}

pub struct Slot {
    /// Guards the routine hand-off between submitter and worker.
    state: Mutex<SlotState>,
    /// The slot's worker waits here while the marker is zero.
    filled: Condvar,
    /// Submitting thread's marker while busy, [`FREE`] otherwise.
    marker: AtomicU64,
}

impl Slot {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState { routine: None }),
            filled: Condvar::new(),
            marker: AtomicU64::new(FREE),
        }
    }

    /// Current occupancy marker.
    pub fn marker(&self) -> u64 {
        self.marker.load(Ordering::Acquire)
    }

    pub fn is_free(&self) -> bool {
        self.marker() == FREE
    }

    /// Hands a task to this slot and wakes its worker.
    ///
    /// The caller must have observed the slot free while holding the pool's
    /// scheduling mutex; that lock is what makes the claim atomic across
    /// submitters. The routine is written before the marker is published,
    /// both under the slot mutex, so the woken worker observes a fully
    /// formed task.
    pub fn fill(&self, routine: Option<TaskFn>, marker: u64) {
        debug_assert_ne!(marker, FREE);
        let mut state = self.state.lock();
        state.routine = routine;
        self.marker.store(marker, Ordering::Release);
        self.filled.notify_all();
    }

    /// Blocks until the slot is filled or `stop` is raised while idle.
    ///
    /// Returns `Some(routine)` once the marker is non-zero (the routine may
    /// itself be `None`, which executes as a no-op), or `None` when the pool
    /// is shutting down and no task is pending. A task already claimed when
    /// stop is raised is still returned and runs to completion.
    pub fn wait_for_work(&self, stop: &AtomicBool) -> Option<Option<TaskFn>> {
        let mut state = self.state.lock();
        while self.marker.load(Ordering::Acquire) == FREE {
            if stop.load(Ordering::Acquire) {
                return None;
            }
            self.filled.wait(&mut state);
        }
        Some(state.routine.take())
    }

    /// Recycles the slot after execution. No notification: submitters
    /// discover freed capacity only by scanning, matching the dispatch
    /// protocol's one-way signaling.
    pub fn clear(&self) {
        self.marker.store(FREE, Ordering::Release);
    }

    /// Wakes the slot's worker without filling it, so it can observe a
    /// raised stop flag. Takes the slot mutex to avoid a lost wakeup
    /// against a worker about to block.
    pub fn wake(&self) {
        let _state = self.state.lock();
        self.filled.notify_all();
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot").field("marker", &self.marker()).finish()
    }
}
