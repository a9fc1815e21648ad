//! Backoff for the polling join loop.

use std::hint::spin_loop;
use std::thread;

/// Spin-then-yield backoff.
#[derive(Debug)]
pub struct SimpleBackoff {
    step: usize,
}

impl SimpleBackoff {
    const MAX_SPINS: usize = 10;

    /// Create a new backoff
    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Perform one step of backoff
    pub fn spin(&mut self) {
        if self.step < Self::MAX_SPINS {
            for _ in 0..(1 << self.step) {
                spin_loop();
            }
            self.step += 1;
        } else {
            thread::yield_now();
        }
    }

    /// Reset backoff
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

impl Default for SimpleBackoff {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_backoff() {
        let mut backoff = SimpleBackoff::new();

        // Should not panic
        for _ in 0..20 {
            backoff.spin();
        }

        backoff.reset();
        // Should work after reset
        backoff.spin();
    }
}
