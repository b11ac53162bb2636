//! Shared fixtures for the integration tests.

mod axis_isolation;
mod control_accuracy;
mod safety_stop;
mod telemetry_drain;

use servo_common::config::AxisConfig;
use servo_control_unit::cycle::{AxisHardware, AxisTask};
use servo_control_unit::scheduler::Scheduler;
use servo_hal::drivers::simulation::{SimCounter, SimEnable, SimPwm};
use servo_hal::{MotorModel, SimAxis, SimClock};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

pub type SimTask = AxisTask<SimCounter, SimPwm, SimEnable, SimClock>;

pub fn axis_config(name: &str, setpoint_deg: f64, kp: f64, ki: f64, kd: f64) -> AxisConfig {
    AxisConfig {
        name: name.to_string(),
        kp,
        ki,
        kd,
        setpoint_deg,
        ..AxisConfig::default()
    }
}

/// Plant plus control task wired to it.
pub fn sim_axis(config: &AxisConfig, clock: &SimClock) -> (SimAxis, SimTask) {
    let plant = SimAxis::new(MotorModel::default(), config.counts_per_rev, config.counter_period);
    let hardware = AxisHardware {
        timer: plant.counter(),
        forward: plant.forward_channel(),
        reverse: plant.reverse_channel(),
        enable: plant.enable_pin(),
    };
    let task = AxisTask::new(config, hardware, clock.clone()).unwrap();
    (plant, task)
}

/// Advance simulated time 1 ms at a time, polling the scheduler each step.
pub fn run_ms(scheduler: &mut Scheduler<'_, SimClock>, clock: &SimClock, plants: &[SimAxis], ms: u32) {
    for _ in 0..ms {
        scheduler.poll();
        for plant in plants {
            plant.advance(Duration::from_millis(1));
        }
        clock.advance(1);
    }
}

/// In-memory telemetry sink readable after the task is boxed.
#[derive(Debug, Clone, Default)]
pub struct SharedSink(Rc<RefCell<Vec<u8>>>);

impl SharedSink {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.borrow())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
