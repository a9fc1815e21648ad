//! Process-wide identities: submitter markers and correlation signatures.
//!
//! Markers and signatures share one number space split by parity. Submitter
//! markers (slot occupancy values) are even and non-zero; signatures are
//! odd. Neither can collide with the other or with the free sentinel.

use std::sync::atomic::{AtomicU64, Ordering};

// Odd series: 1, 3, 5, ...
static NEXT_SIGNATURE: AtomicU64 = AtomicU64::new(1);

// Even series: 2, 4, 6, ...
static NEXT_MARKER: AtomicU64 = AtomicU64::new(2);

thread_local! {
    static MARKER: u64 = NEXT_MARKER.fetch_add(2, Ordering::Relaxed);
}

/// Identity of the calling thread as used in slot occupancy markers.
/// Assigned once per thread, always even and non-zero.
pub(crate) fn submitter_marker() -> u64 {
    MARKER.with(|m| *m)
}

/// Returns a process-wide distinct odd identifier, monotonically increasing
/// by 2 per call. Usable as a correlation token that can never be mistaken
/// for a thread's submitter marker.
pub fn unique_signature() -> u64 {
    NEXT_SIGNATURE.fetch_add(2, Ordering::Relaxed)
}
