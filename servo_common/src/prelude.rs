//! Prelude module for common re-exports.
//!
//! ```rust
//! use servo_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    AxisConfig, ConfigError, ConfigLoader, DrainPolicy, LogLevel, ServoConfig, SharedConfig,
    TelemetryConfig,
};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{
    DEFAULT_COUNTER_PERIOD, DEFAULT_COUNTS_PER_REV, DEFAULT_NOMINAL_PERIOD_MS, DERIVATIVE_WINDOW,
    MAX_AXES, MAX_TELEMETRY_QUEUE_CAPACITY,
};

// ─── Hardware Capabilities ──────────────────────────────────────────
pub use crate::hal::{DutyCommand, EnablePin, HalError, MonotonicClock, PwmChannel, TimerCounter};
