//! # Servo HAL Library
//!
//! Implementations of the hardware capabilities declared in
//! `servo_common::hal::driver`.
//!
//! # Module Structure
//!
//! - [`clock`] - Host monotonic clock backed by `std::time::Instant`
//! - [`drivers`] - Driver implementations (currently: simulation)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────────┐
//! │   servo_control_unit     │      │          servo_hal           │
//! │  decoder ── TimerCounter ├─────►│  SimCounter ┐                │
//! │  actuator ─ PwmChannel   ├─────►│  SimPwm ────┼─► SimAxis plant│
//! │           └ EnablePin    ├─────►│  SimEnable ─┘                │
//! │  controller MonotonicClock ────►│  SystemClock / SimClock      │
//! └──────────────────────────┘      └──────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod clock;
pub mod drivers;

pub use crate::clock::SystemClock;
pub use crate::drivers::simulation::{MotorModel, SimAxis, SimClock};
