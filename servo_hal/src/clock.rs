//! Host monotonic clock.

use servo_common::hal::MonotonicClock;
use std::time::Instant;

/// Millisecond clock measured from construction, backed by `Instant`.
///
/// Ticks wrap at `u32::MAX` like a hardware tick counter.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose tick zero is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    #[inline]
    fn now_ms(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }
}
