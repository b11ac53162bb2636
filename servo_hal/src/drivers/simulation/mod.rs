//! Simulation driver module.
//!
//! Provides a software DC motor with a quadrature encoder behind the same
//! capability traits a board would implement, plus a manually stepped clock.

mod axis;
mod clock;
mod physics;

pub use axis::{SimAxis, SimCounter, SimEnable, SimPwm};
pub use clock::SimClock;
pub use physics::MotorModel;
