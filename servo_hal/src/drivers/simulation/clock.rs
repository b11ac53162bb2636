//! Manually stepped clock for deterministic simulation and tests.

use servo_common::hal::MonotonicClock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Shared millisecond counter advanced explicitly by the simulation.
///
/// Clones observe the same time, so one clock can be handed to every
/// controller and the scheduler.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    ticks: Arc<AtomicU32>,
}

impl SimClock {
    /// Create a clock starting at `start_ms`.
    pub fn starting_at(start_ms: u32) -> Self {
        Self {
            ticks: Arc::new(AtomicU32::new(start_ms)),
        }
    }

    /// Advance the clock by `ms` (wrapping at `u32::MAX`).
    pub fn advance(&self, ms: u32) {
        self.ticks.fetch_add(ms, Ordering::SeqCst);
    }

    /// Jump to an absolute tick value.
    pub fn set(&self, ms: u32) {
        self.ticks.store(ms, Ordering::SeqCst);
    }
}

impl MonotonicClock for SimClock {
    #[inline]
    fn now_ms(&self) -> u32 {
        self.ticks.load(Ordering::SeqCst)
    }
}
