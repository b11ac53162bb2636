//! Quadrature decoder with wraparound-corrected position accumulation.
//!
//! The hardware timer counts modulo `M = period + 1`. Each read computes
//! the raw delta against the previous sample and folds it into the range
//! `(-M/2, M/2)`:
//!
//! ```text
//! delta = raw_new − raw_prev
//! if 2·delta ≥  M  → delta −= M   (counter underflowed)
//! if 2·delta ≤ −M  → delta += M   (counter overflowed)
//! ```
//!
//! The decoder therefore tracks the true position as long as the shaft
//! never moves more than `M/2` counts between two reads.

use servo_common::hal::{HalError, TimerCounter};
use tracing::debug;

/// Convert an accumulated count into shaft degrees.
#[inline]
pub fn counts_to_degrees(counts: i64, counts_per_rev: u32) -> f64 {
    counts as f64 * 360.0 / counts_per_rev as f64
}

/// Fold a raw counter difference into `(-M/2, M/2)`.
#[inline]
pub fn unwrap_delta(raw_new: u32, raw_prev: u32, modulus: i64) -> i64 {
    let delta = raw_new as i64 - raw_prev as i64;
    if 2 * delta >= modulus {
        delta - modulus
    } else if 2 * delta <= -modulus {
        delta + modulus
    } else {
        delta
    }
}

/// Accumulates an unbounded signed position from a wrapping timer-counter.
#[derive(Debug)]
pub struct QuadratureDecoder<T> {
    timer: T,
    position: i64,
    raw_prev: u32,
    raw_new: u32,
}

impl<T: TimerCounter> QuadratureDecoder<T> {
    /// Take ownership of `timer` and zero its counter.
    ///
    /// # Errors
    ///
    /// Propagates the capability error if the counter cannot be written.
    pub fn new(mut timer: T) -> Result<Self, HalError> {
        timer.set_counter(0)?;
        Ok(Self {
            timer,
            position: 0,
            raw_prev: 0,
            raw_new: 0,
        })
    }

    /// Sample the counter and return the accumulated position [counts].
    ///
    /// # Errors
    ///
    /// Propagates the capability error; the accumulated position is left
    /// untouched in that case.
    pub fn read(&mut self) -> Result<i64, HalError> {
        let modulus = self.timer.period() as i64 + 1;
        self.raw_new = self.timer.counter()?;
        self.position += unwrap_delta(self.raw_new, self.raw_prev, modulus);
        self.raw_prev = self.raw_new;
        Ok(self.position)
    }

    /// Reset the hardware counter and the software position to zero.
    ///
    /// Software state changes only after the hardware write succeeded, so a
    /// failed zero never leaves the two out of step.
    pub fn zero(&mut self) -> Result<(), HalError> {
        self.timer.set_counter(0)?;
        self.position = 0;
        self.raw_prev = 0;
        self.raw_new = 0;
        debug!("Encoder zeroed");
        Ok(())
    }

    /// Position accumulated by the most recent read [counts].
    #[inline]
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Raw counter value seen by the most recent read.
    #[inline]
    pub fn last_raw(&self) -> u32 {
        self.raw_new
    }

    /// Counter modulus `period + 1`.
    #[inline]
    pub fn modulus(&self) -> i64 {
        self.timer.period() as i64 + 1
    }

    /// Release the timer.
    pub fn into_inner(self) -> T {
        self.timer
    }
}
