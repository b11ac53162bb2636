//! Per-axis control path: PID controller and saturating output stage.

pub mod output;
pub mod pid;

pub use output::{MAX_DUTY_PERCENT, PwmActuator};
pub use pid::{PidGains, PositionController};
