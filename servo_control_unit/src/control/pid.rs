//! Position PID with unbounded integral and windowed derivative.
//!
//! ```text
//! e      = setpoint − measured
//! acc   += e
//! effort = kp·e + ki·acc [+ kd·(e[n] − e[n−9]) / (10·T_nom)]
//! ```
//!
//! The derivative term is active only while `kd > 0`. Errors are pushed
//! into a 10-sample window; once the window is full the slope across it is
//! added and the oldest sample is discarded, so the window never holds more
//! than 10 entries. `T_nom` is the configured nominal period, not the
//! measured interval between calls.
//!
//! No output clamping happens here; the actuator saturates.

use heapless::Deque;
use servo_common::config::AxisConfig;
use servo_common::consts::DERIVATIVE_WINDOW;
use servo_common::hal::MonotonicClock;
use tracing::debug;

/// Controller gains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain (0 = integral ignored, accumulator still runs).
    pub ki: f64,
    /// Derivative gain (0 = windowed derivative disabled).
    pub kd: f64,
}

impl PidGains {
    /// Gains taken from an axis configuration.
    pub fn from_config(config: &AxisConfig) -> Self {
        Self {
            kp: config.kp,
            ki: config.ki,
            kd: config.kd,
        }
    }
}

/// Closed-loop position controller for one axis.
#[derive(Debug)]
pub struct PositionController<C> {
    gains: PidGains,
    setpoint: f64,
    position: f64,
    error: f64,
    error_accumulator: f64,
    effort: f64,
    error_history: Deque<f64, DERIVATIVE_WINDOW>,
    nominal_period_ms: f64,
    clock: C,
    start_ms: u32,
    elapsed_ms: u32,
}

impl<C: MonotonicClock> PositionController<C> {
    /// Create a controller; elapsed time is measured from this call.
    pub fn new(gains: PidGains, setpoint: f64, nominal_period_ms: u32, clock: C) -> Self {
        let start_ms = clock.now_ms();
        Self {
            gains,
            setpoint,
            position: 0.0,
            error: setpoint,
            error_accumulator: 0.0,
            effort: 0.0,
            error_history: Deque::new(),
            nominal_period_ms: nominal_period_ms as f64,
            clock,
            start_ms,
            elapsed_ms: 0,
        }
    }

    /// Create a controller from an axis configuration.
    pub fn from_config(config: &AxisConfig, clock: C) -> Self {
        Self::new(
            PidGains::from_config(config),
            config.setpoint_deg,
            config.nominal_period_ms,
            clock,
        )
    }

    /// Compute the actuation effort for a new position measurement.
    ///
    /// Non-finite input is not filtered and propagates into the result.
    pub fn run(&mut self, measured: f64) -> f64 {
        self.position = measured;
        let elapsed = self.clock.diff_ms(self.clock.now_ms(), self.start_ms);
        self.elapsed_ms = elapsed.max(0) as u32;

        self.error = self.setpoint - measured;
        self.error_accumulator += self.error;
        self.effort = self.gains.kp * self.error + self.gains.ki * self.error_accumulator;

        if self.gains.kd > 0.0 {
            self.effort += self.gains.kd * self.windowed_slope();
        }
        self.effort
    }

    /// Push the current error and return the slope across a full window,
    /// or 0 while the window is still filling.
    fn windowed_slope(&mut self) -> f64 {
        if self.error_history.is_full() {
            self.error_history.pop_front();
        }
        if self.error_history.push_back(self.error).is_err() || !self.error_history.is_full() {
            return 0.0;
        }
        let slope = match (self.error_history.front(), self.error_history.back()) {
            (Some(oldest), Some(newest)) => {
                (newest - oldest) / (DERIVATIVE_WINDOW as f64 * self.nominal_period_ms)
            }
            _ => 0.0,
        };
        self.error_history.pop_front();
        slope
    }

    /// Restart elapsed time and clear position, error, accumulator and the
    /// derivative window. Gains and setpoint are kept.
    pub fn reset(&mut self) {
        self.start_ms = self.clock.now_ms();
        self.elapsed_ms = 0;
        self.position = 0.0;
        self.error = 0.0;
        self.error_accumulator = 0.0;
        self.effort = 0.0;
        self.error_history.clear();
        debug!(setpoint = self.setpoint, "Controller reset");
    }

    // ─── Setters ────────────────────────────────────────────────────

    /// Change the target position.
    #[inline]
    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = setpoint;
    }

    /// Change the proportional gain.
    #[inline]
    pub fn set_kp(&mut self, kp: f64) {
        self.gains.kp = kp;
    }

    /// Change the integral gain.
    #[inline]
    pub fn set_ki(&mut self, ki: f64) {
        self.gains.ki = ki;
    }

    /// Change the derivative gain.
    #[inline]
    pub fn set_kd(&mut self, kd: f64) {
        self.gains.kd = kd;
    }

    /// Replace all gains at once.
    #[inline]
    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    // ─── Getters ────────────────────────────────────────────────────

    #[inline]
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    #[inline]
    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    /// Last measured position.
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Last error (`setpoint − position`).
    #[inline]
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Running error sum since creation or the last reset.
    #[inline]
    pub fn error_accumulator(&self) -> f64 {
        self.error_accumulator
    }

    /// Last computed effort.
    #[inline]
    pub fn effort(&self) -> f64 {
        self.effort
    }

    /// Milliseconds from creation (or reset) to the last `run`.
    #[inline]
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Number of errors currently held in the derivative window.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.error_history.len()
    }
}
