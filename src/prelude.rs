pub use crate::config::{Config, ConfigBuilder};
pub use crate::dispatch::Dispatcher;
pub use crate::error::{Error, Result};
pub use crate::latch::CountLatch;
pub use crate::pool::{unique_signature, NoFreeSlot, PanicStrategy, SlotPool, TaskFn};
