//! Error types of the control core.
//!
//! Propagation policy:
//! - Decoder and controller never fail on numeric input.
//! - The actuator rejects only non-numeric (NaN) effort, after forcing both
//!   channels to zero.
//! - Capability failures pass through as `HardwareFault` and are fatal for
//!   the owning axis task; other axes are unaffected.

use servo_common::hal::HalError;
use thiserror::Error;

/// Errors surfaced by control-loop and telemetry tasks.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Actuator received an effort that is not a number. Both PWM channels
    /// were zeroed before this error was returned.
    #[error("invalid actuator command: {level}")]
    InvalidCommand {
        /// The rejected effort value.
        level: f64,
    },

    /// Timer-counter, PWM or enable capability failed.
    #[error("hardware fault: {0}")]
    HardwareFault(#[from] HalError),

    /// Telemetry sink refused a record.
    #[error("telemetry output failed: {0}")]
    Telemetry(#[from] std::io::Error),
}
