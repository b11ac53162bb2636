//! Hardware abstraction layer capabilities.
//!
//! The control core never touches timer or GPIO registers. It consumes the
//! small capability traits defined in [`driver`]; concrete implementations
//! live in the `servo_hal` crate (host clock, simulation driver) or in board
//! support code.

pub mod driver;
pub mod types;

pub use driver::{EnablePin, HalError, MonotonicClock, PwmChannel, TimerCounter};
pub use types::DutyCommand;
