//! Configuration loading and validation for the control unit.
//!
//! Parses `ServoConfig` from TOML and checks the rules the runtime relies
//! on: axis count within `MAX_AXES`, unique axis names, finite
//! non-negative gains, non-zero periods and scaling, and a telemetry queue
//! capacity within `1..=MAX_TELEMETRY_QUEUE_CAPACITY`.

use std::collections::HashSet;
use std::path::Path;

use servo_common::config::{AxisConfig, ConfigError, ConfigLoader, ServoConfig};
use servo_common::consts::{MAX_AXES, MAX_TELEMETRY_QUEUE_CAPACITY};
use tracing::info;

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<ServoConfig, ConfigError> {
    let config = ServoConfig::load(path)?;
    validate_config(&config)?;
    info!(
        path = %path.display(),
        axes = config.axes.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Parse and validate configuration text.
pub fn load_config_from_str(content: &str) -> Result<ServoConfig, ConfigError> {
    let config = ServoConfig::from_toml(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Check every rule; the first violation is returned.
pub fn validate_config(config: &ServoConfig) -> Result<(), ConfigError> {
    config.shared.validate()?;

    if config.axes.is_empty() {
        return Err(invalid("at least one [[axis]] is required".to_string()));
    }
    if config.axes.len() > MAX_AXES {
        return Err(invalid(format!(
            "{} axes configured, at most {MAX_AXES} supported",
            config.axes.len()
        )));
    }

    let mut names = HashSet::new();
    for axis in &config.axes {
        if !names.insert(axis.name.as_str()) {
            return Err(invalid(format!("duplicate axis name '{}'", axis.name)));
        }
        validate_axis(axis)?;
    }

    let telemetry = &config.telemetry;
    if telemetry.period_ms == 0 {
        return Err(invalid("telemetry.period_ms must be > 0".to_string()));
    }
    if !(1..=MAX_TELEMETRY_QUEUE_CAPACITY).contains(&telemetry.queue_capacity) {
        return Err(invalid(format!(
            "telemetry.queue_capacity {} outside 1..={MAX_TELEMETRY_QUEUE_CAPACITY}",
            telemetry.queue_capacity
        )));
    }
    Ok(())
}

fn validate_axis(axis: &AxisConfig) -> Result<(), ConfigError> {
    let name = &axis.name;
    if name.is_empty() {
        return Err(invalid("axis name cannot be empty".to_string()));
    }
    for (gain, value) in [("kp", axis.kp), ("ki", axis.ki), ("kd", axis.kd)] {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(format!(
                "axis '{name}': {gain} must be finite and >= 0, got {value}"
            )));
        }
    }
    if !axis.setpoint_deg.is_finite() {
        return Err(invalid(format!("axis '{name}': setpoint_deg must be finite")));
    }
    let nonzero = [
        ("counts_per_rev", axis.counts_per_rev),
        ("counter_period", axis.counter_period),
        ("period_ms", axis.period_ms),
        ("nominal_period_ms", axis.nominal_period_ms),
    ];
    for (field, value) in nonzero {
        if value == 0 {
            return Err(invalid(format!("axis '{name}': {field} must be > 0")));
        }
    }
    Ok(())
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::ValidationError(msg)
}
