//! SLOTPOOL - fixed-size worker pool with slot-based dispatch.
//!
//! A pool of N persistent worker threads and N fixed task slots. Each
//! worker blocks on its own slot's condvar; submitters claim the first
//! free slot under a scheduling mutex and wake its worker. Submission
//! never blocks and never queues: a saturated pool hands the routine
//! straight back to the caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use slotpool::prelude::*;
//! use std::sync::Arc;
//!
//! let config = Config::builder().num_threads(4).build().unwrap();
//! let pool = Arc::new(SlotPool::new(&config).unwrap());
//!
//! // Fire work and block until it has run.
//! let dispatcher = Dispatcher::new(pool);
//! dispatcher.submit_and_wait("payload", |payload| {
//!     println!("processed {payload}");
//! });
//! ```
//!
//! # Features
//!
//! - **Slot dispatch**: first-free-slot assignment, no queueing, no
//!   back-pressure; callers decide what to do when the pool is full
//! - **Latch tracking**: batch completion via a shared [`CountLatch`],
//!   exact single-task waits via [`Dispatcher::submit_and_wait`]
//! - **Inline fallback**: every submission path works without a pool
//! - **Panic isolation**: a panicking task is caught and counted, and its
//!   slot is recycled
//! - **Cooperative shutdown**: dropping the pool stops and joins every
//!   worker

// Lint configuration
#![warn(missing_debug_implementations)]
#![allow(dead_code)] // During development

pub mod config;
pub mod dispatch;
pub mod error;
pub mod latch;
pub mod pool;
pub mod prelude;
pub mod util;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use latch::CountLatch;
pub use pool::{unique_signature, PanicStrategy, SlotPool};
