//! System-wide constants for the servo workspace.
//!
//! Single source of truth for numeric limits and defaults.
//! Imported by all crates.

/// Maximum number of independently controlled axes.
pub const MAX_AXES: usize = 4;

/// Number of error samples in the windowed-derivative buffer.
pub const DERIVATIVE_WINDOW: usize = 10;

/// Nominal sample period assumed by the windowed derivative [ms].
pub const DEFAULT_NOMINAL_PERIOD_MS: u32 = 10;

/// Default hardware counter period (modulus − 1) for a 16-bit timer.
pub const DEFAULT_COUNTER_PERIOD: u32 = 0xFFFF;

/// Encoder counts per output shaft revolution (16 lines × 256:1 gearbox × 4 edges).
pub const DEFAULT_COUNTS_PER_REV: u32 = 16 * 256 * 4;

/// Default control-loop activation period [ms].
pub const DEFAULT_AXIS_PERIOD_MS: u32 = 20;

/// Default telemetry drain activation period [ms].
pub const DEFAULT_TELEMETRY_PERIOD_MS: u32 = 10;

/// Default telemetry queue capacity: 1.5 s of samples at 20 ms.
pub const DEFAULT_TELEMETRY_QUEUE_CAPACITY: usize = 75;

/// Upper bound on telemetry queue capacity (fixed backing storage).
pub const MAX_TELEMETRY_QUEUE_CAPACITY: usize = 512;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/servo.toml";
