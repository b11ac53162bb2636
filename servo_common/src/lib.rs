//! Servo Common Library
//!
//! Shared constants, configuration loading and hardware capability traits
//! for all servo workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Numeric limits and defaults (derivative window, counter period, ...)
//! - [`config`] - Configuration types and the TOML `ConfigLoader`
//! - [`hal`] - Hardware capabilities consumed by the control core
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use servo_common::prelude::*;
//!
//! let axis = AxisConfig::default();
//! assert_eq!(axis.counts_per_rev, DEFAULT_COUNTS_PER_REV);
//! ```

pub mod config;
pub mod consts;
pub mod hal;
pub mod prelude;
