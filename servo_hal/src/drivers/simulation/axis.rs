//! Simulated motor axis.
//!
//! A `SimAxis` owns the shared plant state; the capability handles it hands
//! out (`SimCounter`, two `SimPwm`, `SimEnable`) all refer to that state, the
//! same way the encoder timer and the PWM timer of a board refer to one
//! physical motor.

use servo_common::hal::{DutyCommand, EnablePin, HalError, PwmChannel, TimerCounter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

use super::physics::{MotorModel, ShaftState};

#[derive(Debug)]
struct SimAxisState {
    model: MotorModel,
    counts_per_rev: u32,
    counter_period: u32,
    shaft: ShaftState,
    /// Added to the shaft count to produce the raw counter value.
    counter_offset: i64,
    forward: f64,
    reverse: f64,
    enabled: bool,
    fault: Option<String>,
}

impl SimAxisState {
    fn shaft_counts(&self) -> i64 {
        (self.shaft.angle_deg * self.counts_per_rev as f64 / 360.0).floor() as i64
    }

    fn raw_counter(&self) -> u32 {
        let modulus = self.counter_period as i64 + 1;
        (self.shaft_counts() + self.counter_offset).rem_euclid(modulus) as u32
    }

    fn check_fault(&self) -> Result<(), HalError> {
        match &self.fault {
            Some(reason) => Err(HalError::NotAvailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn drive_percent(&self) -> f64 {
        if self.enabled {
            self.forward - self.reverse
        } else {
            0.0
        }
    }
}

type Shared = Arc<Mutex<SimAxisState>>;

fn lock(state: &Shared) -> MutexGuard<'_, SimAxisState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated DC gear motor with quadrature encoder.
#[derive(Debug, Clone)]
pub struct SimAxis {
    state: Shared,
}

impl SimAxis {
    /// Create a plant at rest at 0°, counter zeroed, driver disabled.
    pub fn new(model: MotorModel, counts_per_rev: u32, counter_period: u32) -> Self {
        debug!(
            "SimAxis created: {:.0} deg/s @100%, tau={:.3}s, {} counts/rev, period={}",
            model.max_speed_deg_s, model.time_constant_s, counts_per_rev, counter_period
        );
        Self {
            state: Arc::new(Mutex::new(SimAxisState {
                model,
                counts_per_rev,
                counter_period,
                shaft: ShaftState::default(),
                counter_offset: 0,
                forward: 0.0,
                reverse: 0.0,
                enabled: false,
                fault: None,
            })),
        }
    }

    /// Encoder timer-counter handle.
    pub fn counter(&self) -> SimCounter {
        SimCounter {
            state: Arc::clone(&self.state),
        }
    }

    /// Forward (IN1) PWM channel handle.
    pub fn forward_channel(&self) -> SimPwm {
        SimPwm {
            state: Arc::clone(&self.state),
            channel: Channel::Forward,
        }
    }

    /// Reverse (IN2) PWM channel handle.
    pub fn reverse_channel(&self) -> SimPwm {
        SimPwm {
            state: Arc::clone(&self.state),
            channel: Channel::Reverse,
        }
    }

    /// Driver enable line handle.
    pub fn enable_pin(&self) -> SimEnable {
        SimEnable {
            state: Arc::clone(&self.state),
        }
    }

    /// Integrate the plant forward by `dt` under the current outputs.
    pub fn advance(&self, dt: Duration) {
        let mut s = lock(&self.state);
        let drive = s.drive_percent();
        let model = s.model;
        model.integrate(&mut s.shaft, drive, dt);
    }

    /// True shaft angle [deg].
    pub fn angle_deg(&self) -> f64 {
        lock(&self.state).shaft.angle_deg
    }

    /// True shaft velocity [deg/s].
    pub fn velocity_deg_s(&self) -> f64 {
        lock(&self.state).shaft.velocity_deg_s
    }

    /// Place the shaft at `angle_deg` and stop it.
    ///
    /// The counter moves by the equivalent number of counts, as if the shaft
    /// had been turned by hand between two samples.
    pub fn set_angle_deg(&self, angle_deg: f64) {
        let mut s = lock(&self.state);
        s.shaft.angle_deg = angle_deg;
        s.shaft.velocity_deg_s = 0.0;
    }

    /// Raw encoder counter value.
    pub fn raw_counter(&self) -> u32 {
        lock(&self.state).raw_counter()
    }

    /// Currently applied outputs.
    pub fn duty(&self) -> DutyCommand {
        let s = lock(&self.state);
        DutyCommand {
            forward: s.forward,
            reverse: s.reverse,
            enabled: s.enabled,
        }
    }

    /// Inject (`Some`) or clear (`None`) a peripheral fault. While set,
    /// every capability call on this axis fails with `HalError::NotAvailable`.
    pub fn set_fault(&self, reason: Option<&str>) {
        let mut s = lock(&self.state);
        match reason {
            Some(r) => warn!("SimAxis fault injected: {r}"),
            None => debug!("SimAxis fault cleared"),
        }
        s.fault = reason.map(str::to_string);
    }
}

/// Encoder timer-counter of a [`SimAxis`].
#[derive(Debug, Clone)]
pub struct SimCounter {
    state: Shared,
}

impl TimerCounter for SimCounter {
    fn counter(&self) -> Result<u32, HalError> {
        let s = lock(&self.state);
        s.check_fault()?;
        Ok(s.raw_counter())
    }

    fn set_counter(&mut self, value: u32) -> Result<(), HalError> {
        let mut s = lock(&self.state);
        s.check_fault()?;
        if value > s.counter_period {
            return Err(HalError::InvalidValue(format!(
                "counter {value} exceeds period {}",
                s.counter_period
            )));
        }
        s.counter_offset = value as i64 - s.shaft_counts();
        Ok(())
    }

    fn period(&self) -> u32 {
        lock(&self.state).counter_period
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Forward,
    Reverse,
}

/// One PWM channel of a [`SimAxis`].
#[derive(Debug, Clone)]
pub struct SimPwm {
    state: Shared,
    channel: Channel,
}

impl PwmChannel for SimPwm {
    fn set_pulse_width_percent(&mut self, percent: f64) -> Result<(), HalError> {
        let mut s = lock(&self.state);
        s.check_fault()?;
        if !(0.0..=100.0).contains(&percent) {
            return Err(HalError::InvalidValue(format!(
                "pulse width {percent}% out of range"
            )));
        }
        match self.channel {
            Channel::Forward => s.forward = percent,
            Channel::Reverse => s.reverse = percent,
        }
        Ok(())
    }
}

/// Enable line of a [`SimAxis`].
#[derive(Debug, Clone)]
pub struct SimEnable {
    state: Shared,
}

impl EnablePin for SimEnable {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), HalError> {
        let mut s = lock(&self.state);
        s.check_fault()?;
        s.enabled = enabled;
        Ok(())
    }
}
