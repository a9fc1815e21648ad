use super::panic_handler::PanicHandler;
use super::signature::submitter_marker;
use super::slot::{Slot, TaskFn};
use super::worker::Worker;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::util::SimpleBackoff;
use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

/// Returned by [`SlotPool::submit`] when every slot is busy.
///
/// Hands the routine back untouched so the caller can retry, drop it, or
/// run it inline. Saturation is an expected outcome of the no-queue
/// dispatch protocol, not a fault.
pub struct NoFreeSlot(pub Option<TaskFn>);

impl std::fmt::Debug for NoFreeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NoFreeSlot")
    }
}

impl From<NoFreeSlot> for Error {
    fn from(_: NoFreeSlot) -> Self {
        Error::NoFreeSlot
    }
}

struct WorkerHandle {
    #[allow(dead_code)]
    id: usize,
    thread: Option<JoinHandle<()>>,
    thread_id: ThreadId,
}

/// Fixed-size worker pool with slot-based dispatch.
///
/// N worker threads and N task slots, both fixed at construction. Worker
/// *i* waits on slot *i*, but submitters claim whichever slot is free
/// first, so slot index says nothing about which submission lands where.
/// Submission never blocks and never queues: when every slot is busy the
/// routine is handed straight back.
pub struct SlotPool {
    workers: Vec<WorkerHandle>,
    slots: Vec<Arc<Slot>>,
    /// Serializes slot search and claim across submitters.
    sched: Mutex<()>,
    /// General-purpose lock for callers; never taken by scheduling.
    advisory: Mutex<()>,
    stop: Arc<AtomicBool>,
    panics: Arc<PanicHandler>,
    num_threads: usize,
}

impl SlotPool {
    /// Builds a pool from `config`, spawning one worker per slot.
    ///
    /// On partial failure every already-spawned worker is stopped and
    /// joined before the error is returned; no half-built pool escapes.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let num_threads = config.worker_threads();

        let stop = Arc::new(AtomicBool::new(false));
        let panics = Arc::new(PanicHandler::new(config.panic_strategy));

        let slots: Vec<Arc<Slot>> = (0..num_threads).map(|_| Arc::new(Slot::new())).collect();

        let mut workers: Vec<WorkerHandle> = Vec::with_capacity(num_threads);

        for id in 0..num_threads {
            let worker = Worker::new(id, slots[id].clone(), panics.clone());
            let stop_clone = stop.clone();
            let name = format!("{}-{}", config.thread_name_prefix, id);

            let mut builder = thread::Builder::new().name(name);
            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let spawned = builder.spawn(move || worker.run(stop_clone));

            match spawned {
                Ok(thread) => {
                    let thread_id = thread.thread().id();
                    workers.push(WorkerHandle {
                        id,
                        thread: Some(thread),
                        thread_id,
                    });
                }
                Err(e) => {
                    tracing::error!(worker = id, "spawn failed: {}", e);
                    Self::stop_workers(&stop, &slots, &mut workers);
                    return Err(Error::exhausted(format!("spawn failed: {}", e)));
                }
            }
        }

        Ok(Self {
            workers,
            slots,
            sched: Mutex::new(()),
            advisory: Mutex::new(()),
            stop,
            panics,
            num_threads,
        })
    }

    /// Hands `routine` to the first free slot and wakes its worker.
    ///
    /// Returns the claimed slot's index, useful for diagnostics only: by
    /// the time the caller reads it the slot may already have finished and
    /// been reclaimed by another submitter. A `None` routine is a legal
    /// no-op submission that still occupies a slot until its worker cycles
    /// the marker.
    pub fn submit(&self, routine: Option<TaskFn>) -> std::result::Result<usize, NoFreeSlot> {
        let marker = submitter_marker();

        let _guard = self.sched.lock();
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.is_free() {
                slot.fill(routine, marker);
                return Ok(index);
            }
        }

        tracing::trace!("submission rejected, all {} slots busy", self.num_threads);
        Err(NoFreeSlot(routine))
    }

    /// Boxing convenience over [`submit`](Self::submit).
    pub fn execute<F>(&self, f: F) -> std::result::Result<usize, NoFreeSlot>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Some(Box::new(f)))
    }

    /// Number of currently free slots.
    pub fn ready_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_free()).count()
    }

    /// Number of currently busy slots, pool-wide.
    pub fn total_busy_slots(&self) -> usize {
        self.num_threads - self.ready_slots()
    }

    /// Number of busy slots whose task the *calling* thread submitted.
    ///
    /// This is a per-caller figure, not a pool-wide one; use
    /// [`total_busy_slots`](Self::total_busy_slots) for the latter.
    pub fn outstanding_submissions(&self) -> usize {
        let marker = submitter_marker();
        self.slots.iter().filter(|s| s.marker() == marker).count()
    }

    /// Position of the calling thread in the worker set, or `None` when
    /// called from a thread the pool does not own.
    pub fn worker_index(&self) -> Option<usize> {
        let current = thread::current().id();
        self.workers.iter().position(|w| w.thread_id == current)
    }

    /// Polls until every task the calling thread submitted has completed.
    ///
    /// This is a coarse, spin-and-yield drain of the caller's own work; it
    /// does not wait for tasks submitted by other threads. Call sites that
    /// need precise completion signaling should track submissions with a
    /// [`CountLatch`](crate::latch::CountLatch) instead.
    pub fn wait_for_mine(&self) {
        let marker = submitter_marker();
        let mut backoff = SimpleBackoff::new();

        loop {
            let outstanding = {
                let _guard = self.sched.lock();
                self.slots.iter().filter(|s| s.marker() == marker).count()
            };
            if outstanding == 0 {
                break;
            }
            backoff.spin();
        }
    }

    /// Acquires the advisory lock, a mutex the pool holds on behalf of its
    /// callers for pool-adjacent critical sections. Scheduling never takes
    /// it, so holding the guard does not exclude task dispatch.
    pub fn advisory_lock(&self) -> MutexGuard<'_, ()> {
        self.advisory.lock()
    }

    /// Panics caught from executed tasks so far.
    pub fn panic_count(&self) -> usize {
        self.panics.panic_count()
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Stops all workers and joins them. Tasks already claimed run to
    /// completion; idle workers wake, observe the stop flag, and exit.
    pub fn shutdown(&mut self) {
        Self::stop_workers(&self.stop, &self.slots, &mut self.workers);
    }

    fn stop_workers(stop: &AtomicBool, slots: &[Arc<Slot>], workers: &mut [WorkerHandle]) {
        stop.store(true, Ordering::Release);

        // broadcast so every idle worker re-checks the flag
        for slot in slots {
            slot.wake();
        }

        for worker in workers {
            if let Some(thread) = worker.thread.take() {
                let _ = thread.join();
            }
        }
    }
}

impl Drop for SlotPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SlotPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotPool")
            .field("num_threads", &self.num_threads)
            .field("ready_slots", &self.ready_slots())
            .finish()
    }
}
