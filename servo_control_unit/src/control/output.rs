//! Saturating two-channel PWM actuator.
//!
//! Signed effort maps onto an H-bridge driven by a forward channel, a
//! reverse channel and an enable line:
//!
//! | effort      | enable    | forward          | reverse           |
//! |-------------|-----------|------------------|-------------------|
//! | `0`         | unchanged | 0                | 0                 |
//! | `> 0`       | on        | `min(level,100)` | 0                 |
//! | `< 0`       | on        | 0                | `min(-level,100)` |
//! | NaN         | unchanged | 0                | 0 (then error)    |
//!
//! At most one channel is ever non-zero.

use servo_common::hal::{DutyCommand, EnablePin, HalError, PwmChannel};
use tracing::warn;

use crate::error::ControlError;

/// Upper duty cycle bound [%].
pub const MAX_DUTY_PERCENT: f64 = 100.0;

/// Motor driver output stage for one axis.
#[derive(Debug)]
pub struct PwmActuator<P, E> {
    forward: P,
    reverse: P,
    enable: E,
    command: DutyCommand,
}

impl<P: PwmChannel, E: EnablePin> PwmActuator<P, E> {
    /// Take ownership of the outputs and put them into the safe state
    /// (enable low, both channels at 0 %).
    ///
    /// # Errors
    ///
    /// Propagates the first capability error.
    pub fn new(forward: P, reverse: P, enable: E) -> Result<Self, HalError> {
        let mut actuator = Self {
            forward,
            reverse,
            enable,
            command: DutyCommand::SAFE,
        };
        actuator.enable.set_enabled(false)?;
        actuator.forward.set_pulse_width_percent(0.0)?;
        actuator.reverse.set_pulse_width_percent(0.0)?;
        Ok(actuator)
    }

    /// Drive the outputs from a signed effort, saturating at ±100 %.
    ///
    /// Returns the command actually applied.
    ///
    /// # Errors
    ///
    /// - `InvalidCommand` for NaN effort; both channels are zeroed first.
    /// - `HardwareFault` if any output rejects the write.
    pub fn set_duty_cycle(&mut self, level: f64) -> Result<DutyCommand, ControlError> {
        if level.is_nan() {
            self.zero_channels()?;
            return Err(ControlError::InvalidCommand { level });
        }

        if level > 0.0 {
            self.set_enabled(true)?;
            self.set_reverse(0.0)?;
            self.set_forward(level.min(MAX_DUTY_PERCENT))?;
        } else if level < 0.0 {
            self.set_enabled(true)?;
            self.set_forward(0.0)?;
            self.set_reverse((-level).min(MAX_DUTY_PERCENT))?;
        } else {
            self.zero_channels()?;
        }
        Ok(self.command)
    }

    /// Zero both channels and de-assert enable.
    ///
    /// Every output is attempted even if an earlier one fails; the first
    /// error is returned.
    pub fn disable(&mut self) -> Result<(), HalError> {
        let forward = self.set_forward(0.0);
        let reverse = self.set_reverse(0.0);
        let enable = self.set_enabled(false);
        let result = forward.and(reverse).and(enable);
        if let Err(e) = &result {
            warn!("Actuator disable incomplete: {}", e);
        }
        result
    }

    /// Command currently applied to the outputs.
    #[inline]
    pub fn command(&self) -> DutyCommand {
        self.command
    }

    fn zero_channels(&mut self) -> Result<(), HalError> {
        let forward = self.set_forward(0.0);
        let reverse = self.set_reverse(0.0);
        forward.and(reverse)
    }

    fn set_forward(&mut self, percent: f64) -> Result<(), HalError> {
        self.forward.set_pulse_width_percent(percent)?;
        self.command.forward = percent;
        Ok(())
    }

    fn set_reverse(&mut self, percent: f64) -> Result<(), HalError> {
        self.reverse.set_pulse_width_percent(percent)?;
        self.command.reverse = percent;
        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), HalError> {
        self.enable.set_enabled(enabled)?;
        self.command.enabled = enabled;
        Ok(())
    }
}
