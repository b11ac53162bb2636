//! HAL capability traits and error types.
//!
//! This module defines:
//! - `HalError` - Error types for capability calls
//! - `TimerCounter` - Hardware timer in quadrature-encoder mode
//! - `PwmChannel` - One PWM output channel driven in percent
//! - `EnablePin` - Motor driver enable line
//! - `MonotonicClock` - Millisecond tick source with wrap-safe differences
//!
//! # Timing Contracts
//!
//! Every method is called from inside a control tick and must return
//! without blocking. Implementations report unavailable hardware through
//! `HalError`; they never panic.

use thiserror::Error;

/// Error types for HAL capability calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HalError {
    /// Peripheral is not available (unpowered, released, or faulted).
    #[error("Peripheral not available: {0}")]
    NotAvailable(String),

    /// Hardware communication error.
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),

    /// Value rejected by the peripheral.
    #[error("Invalid value for peripheral: {0}")]
    InvalidValue(String),
}

/// Hardware timer-counter running in quadrature-encoder mode.
///
/// The counter value ranges over `0..=period()` and wraps modulo
/// `period() + 1` in both directions.
pub trait TimerCounter {
    /// Read the raw counter value.
    fn counter(&self) -> Result<u32, HalError>;

    /// Overwrite the raw counter value.
    fn set_counter(&mut self, value: u32) -> Result<(), HalError>;

    /// Auto-reload value (counter modulus − 1).
    fn period(&self) -> u32;
}

/// One PWM output channel.
pub trait PwmChannel {
    /// Set the duty cycle in percent, `0.0..=100.0`.
    fn set_pulse_width_percent(&mut self, percent: f64) -> Result<(), HalError>;
}

/// Motor driver enable line.
pub trait EnablePin {
    /// Assert (`true`) or de-assert (`false`) the enable line.
    fn set_enabled(&mut self, enabled: bool) -> Result<(), HalError>;
}

/// Free-running millisecond clock.
///
/// Tick values wrap at `u32::MAX`; differences are computed modulo 2³²
/// and interpreted as signed, so intervals shorter than ~24 days are exact
/// across a wrap.
pub trait MonotonicClock {
    /// Current tick [ms].
    fn now_ms(&self) -> u32;

    /// Signed interval `later − earlier` [ms].
    #[inline]
    fn diff_ms(&self, later: u32, earlier: u32) -> i32 {
        later.wrapping_sub(earlier) as i32
    }
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &C {
    #[inline]
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
