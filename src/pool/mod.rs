//! Slot-based dispatch infrastructure.
//!
//! This module provides the fixed worker pool, its task slots, the worker
//! loop, and the identity helpers the occupancy protocol relies on.

pub mod panic_handler;
pub mod signature;
pub mod slot;
pub mod slot_pool;
pub mod worker;

pub use panic_handler::{PanicHandler, PanicStrategy};
pub use signature::unique_signature;
pub use slot::TaskFn;
pub use slot_pool::{NoFreeSlot, SlotPool};
