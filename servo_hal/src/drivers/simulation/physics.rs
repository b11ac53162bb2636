//! Motor plant model.
//!
//! First-order velocity response to the applied duty: the shaft speed
//! approaches `max_speed_deg_s × duty / 100` with time constant
//! `time_constant_s`. Integration uses fixed 1 ms substeps so results do
//! not depend on how the caller slices time.

use std::time::Duration;

/// Integration substep [s].
const SUBSTEP_S: f64 = 0.001;

/// Parameters of the simulated DC gear motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorModel {
    /// Steady-state shaft speed at 100 % duty [deg/s].
    pub max_speed_deg_s: f64,
    /// Velocity time constant [s] (0 = speed follows duty instantly).
    pub time_constant_s: f64,
}

impl Default for MotorModel {
    fn default() -> Self {
        Self {
            max_speed_deg_s: 600.0,
            time_constant_s: 0.02,
        }
    }
}

/// Kinematic state of the shaft.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ShaftState {
    pub angle_deg: f64,
    pub velocity_deg_s: f64,
}

impl MotorModel {
    /// Advance `shaft` by `dt` with a constant signed drive in percent.
    pub(crate) fn integrate(&self, shaft: &mut ShaftState, drive_percent: f64, dt: Duration) {
        let target = self.max_speed_deg_s * drive_percent / 100.0;
        let mut remaining = dt.as_secs_f64();

        while remaining > 0.0 {
            let h = remaining.min(SUBSTEP_S);
            if self.time_constant_s <= 0.0 {
                shaft.velocity_deg_s = target;
            } else {
                let alpha = (h / self.time_constant_s).min(1.0);
                shaft.velocity_deg_s += alpha * (target - shaft.velocity_deg_s);
            }
            shaft.angle_deg += shaft.velocity_deg_s * h;
            remaining -= h;
        }
    }
}
