//! HAL driver implementations.
//!
//! - [`simulation`] - Software motor + encoder plant for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the capability traits from `servo_common::hal::driver`
//! 3. Add export and documentation

pub mod simulation;
