//! TOML configuration schema for the servo controller.
//!
//! `ServoConfig` is the file layout: one `[shared]` table, one `[[axis]]`
//! table per controlled axis and an optional `[telemetry]` table. Any
//! deserializable type can be read from disk through [`ConfigLoader`].
//!
//! ```rust,no_run
//! use servo_common::config::{ConfigLoader, ServoConfig};
//! use std::path::Path;
//!
//! let config = ServoConfig::load(Path::new("config/servo.toml")).unwrap();
//! for axis in &config.axes {
//!     println!("{} -> {} deg", axis.name, axis.setpoint_deg);
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

use crate::consts::{
    DEFAULT_AXIS_PERIOD_MS, DEFAULT_COUNTER_PERIOD, DEFAULT_COUNTS_PER_REV,
    DEFAULT_NOMINAL_PERIOD_MS, DEFAULT_TELEMETRY_PERIOD_MS, DEFAULT_TELEMETRY_QUEUE_CAPACITY,
};

/// Failure to obtain a usable configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("config file does not exist")]
    FileNotFound,

    /// Unreadable file or malformed TOML.
    #[error("cannot parse config: {0}")]
    ParseError(String),

    /// Well-formed TOML whose values the controller cannot run with.
    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Default verbosity of the tracing subscriber, overridden by `RUST_LOG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// `[shared]` table.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "servo-bench-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Name reported in logs; must not be blank.
    pub service_name: String,
}

impl SharedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "shared.service_name is blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// How the telemetry consumer drains its time/position queue pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DrainPolicy {
    /// Emit a record whenever both queues hold at least one entry.
    #[default]
    Continuous,
    /// Wait until both queues are full, then drain pair by pair until either
    /// one runs empty.
    WhenFull,
}

/// Per-axis control loop configuration.
///
/// # TOML Example
///
/// ```toml
/// [[axis]]
/// name = "pitch"
/// kp = 1.5
/// setpoint_deg = 180.0
/// period_ms = 20
/// priority = 1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AxisConfig {
    /// Axis identifier, unique within a configuration.
    pub name: String,
    /// Proportional gain [%/deg].
    pub kp: f64,
    /// Integral gain [%/(deg·tick)].
    pub ki: f64,
    /// Derivative gain (0 disables the windowed derivative).
    pub kd: f64,
    /// Target shaft angle [deg].
    pub setpoint_deg: f64,
    /// Encoder counts per output shaft revolution.
    pub counts_per_rev: u32,
    /// Hardware counter period (modulus − 1).
    pub counter_period: u32,
    /// Control loop activation period [ms].
    pub period_ms: u32,
    /// Scheduler priority (higher runs first).
    pub priority: u8,
    /// Constant time base of the windowed derivative [ms].
    pub nominal_period_ms: u32,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            name: "axis".to_string(),
            kp: 1.63,
            ki: 0.0,
            kd: 0.3,
            setpoint_deg: 90.0,
            counts_per_rev: DEFAULT_COUNTS_PER_REV,
            counter_period: DEFAULT_COUNTER_PERIOD,
            period_ms: DEFAULT_AXIS_PERIOD_MS,
            priority: 1,
            nominal_period_ms: DEFAULT_NOMINAL_PERIOD_MS,
        }
    }
}

impl AxisConfig {
    /// Shaft angle represented by one encoder count [deg].
    #[inline]
    pub fn degrees_per_count(&self) -> f64 {
        360.0 / self.counts_per_rev as f64
    }
}

/// Telemetry consumer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Register the telemetry consumer task at all.
    pub enabled: bool,
    /// Consumer activation period [ms].
    pub period_ms: u32,
    /// Scheduler priority of the consumer.
    pub priority: u8,
    /// Capacity of each time/position queue.
    pub queue_capacity: usize,
    /// Drain discipline.
    pub drain: DrainPolicy,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period_ms: DEFAULT_TELEMETRY_PERIOD_MS,
            priority: 3,
            queue_capacity: DEFAULT_TELEMETRY_QUEUE_CAPACITY,
            drain: DrainPolicy::Continuous,
        }
    }
}

/// Top-level servo controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServoConfig {
    /// Common application fields.
    pub shared: SharedConfig,
    /// Controlled axes, one `[[axis]]` table each.
    #[serde(rename = "axis", default)]
    pub axes: Vec<AxisConfig>,
    /// Telemetry consumer settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Reads any deserializable config type from a TOML file.
///
/// A missing file maps to `FileNotFound`; every other read or syntax
/// failure maps to `ParseError`.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ConfigError::FileNotFound),
            Err(e) => Err(ConfigError::ParseError(format!("{}: {e}", path.display()))),
        }
    }

    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
