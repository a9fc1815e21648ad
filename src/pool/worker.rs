// worker thread loop
use super::panic_handler::PanicHandler;
use super::slot::Slot;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub type WorkerId = usize;

/// One persistent pool thread, bound to a single slot for its lifetime.
///
/// Two live states: idle (blocked on the slot's condvar, marker zero) and
/// running (marker non-zero, executing the routine). The loop exits only
/// when the stop flag is observed, giving the explicit stopped state the
/// pool's teardown relies on.
pub(crate) struct Worker {
    pub id: WorkerId,
    pub slot: Arc<Slot>,
    pub panics: Arc<PanicHandler>,
}

impl Worker {
    pub fn new(id: WorkerId, slot: Arc<Slot>, panics: Arc<PanicHandler>) -> Self {
        Self { id, slot, panics }
    }

    pub fn run(&self, stop: Arc<AtomicBool>) {
        loop {
            let routine = match self.slot.wait_for_work(&stop) {
                Some(routine) => routine,
                // stop raised while idle
                None => break,
            };

            // A null routine is legal and only cycles the marker. A panic
            // is recorded by the handler; the slot is recycled either way.
            if let Some(f) = routine {
                let _ = self.panics.execute(f);
            }

            self.slot.clear();

            if stop.load(Ordering::Acquire) {
                break;
            }
        }

        tracing::trace!(worker = self.id, "worker stopped");
    }
}
