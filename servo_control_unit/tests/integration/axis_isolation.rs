//! Integration test: two axes stepped in interleaved order produce the same
//! per-axis trajectories as each axis stepped alone.

use super::{SharedSink, SimTask, axis_config, run_ms, sim_axis};
use servo_common::config::{AxisConfig, DrainPolicy};
use servo_control_unit::cycle::AxisSnapshot;
use servo_control_unit::scheduler::Scheduler;
use servo_control_unit::telemetry::{TelemetryTask, telemetry_channel};
use servo_hal::{SimAxis, SimClock};
use std::time::Duration;

const TICKS: usize = 150;

fn configs() -> (AxisConfig, AxisConfig) {
    (
        axis_config("a", 180.0, 1.5, 0.0, 0.0),
        axis_config("b", 360.0, 1.5, 0.01, 0.3),
    )
}

fn solo(cfg: &AxisConfig) -> Vec<AxisSnapshot> {
    let clock = SimClock::default();
    let (plant, mut task) = sim_axis(cfg, &clock);
    (0..TICKS)
        .map(|_| {
            let snap = task.tick().unwrap();
            plant.advance(Duration::from_millis(10));
            clock.advance(10);
            snap
        })
        .collect()
}

fn step(task: &mut SimTask, plant: &SimAxis, out: &mut Vec<AxisSnapshot>) {
    out.push(task.tick().unwrap());
    plant.advance(Duration::from_millis(10));
}

#[test]
fn interleaved_ticks_match_solo_runs() {
    let (cfg_a, cfg_b) = configs();
    let expected_a = solo(&cfg_a);
    let expected_b = solo(&cfg_b);

    let clock = SimClock::default();
    let (plant_a, mut task_a) = sim_axis(&cfg_a, &clock);
    let (plant_b, mut task_b) = sim_axis(&cfg_b, &clock);
    let (mut got_a, mut got_b) = (Vec::new(), Vec::new());

    for n in 0..TICKS {
        // Alternate which axis goes first.
        if n % 2 == 0 {
            step(&mut task_a, &plant_a, &mut got_a);
            step(&mut task_b, &plant_b, &mut got_b);
        } else {
            step(&mut task_b, &plant_b, &mut got_b);
            step(&mut task_a, &plant_a, &mut got_a);
        }
        clock.advance(10);
    }

    assert_eq!(got_a, expected_a);
    assert_eq!(got_b, expected_b);
    assert_ne!(got_a, got_b);
}

fn scheduled_telemetry(cfgs: &[&AxisConfig]) -> Vec<Vec<String>> {
    let clock = SimClock::default();
    let mut scheduler = Scheduler::new(clock.clone());
    let mut plants = Vec::new();
    let mut sinks = Vec::new();

    for (i, cfg) in cfgs.iter().enumerate() {
        let (plant, task) = sim_axis(cfg, &clock);
        let (tx, rx) = telemetry_channel(16);
        let sink = SharedSink::default();
        let drain = TelemetryTask::new(
            format!("{}-telemetry", cfg.name),
            rx,
            sink.clone(),
            DrainPolicy::Continuous,
        );
        scheduler.add(Box::new(task.with_telemetry(tx)), i as u8 + 1, 20);
        scheduler.add(Box::new(drain), 5, 10);
        plants.push(plant);
        sinks.push(sink);
    }

    run_ms(&mut scheduler, &clock, &plants, 1_000);
    scheduler.shutdown().unwrap();
    sinks.iter().map(SharedSink::lines).collect()
}

#[test]
fn scheduled_axes_do_not_interfere() {
    let (cfg_a, cfg_b) = configs();
    let alone_a = scheduled_telemetry(&[&cfg_a]).remove(0);
    let alone_b = scheduled_telemetry(&[&cfg_b]).remove(0);
    let together = scheduled_telemetry(&[&cfg_a, &cfg_b]);

    assert_eq!(alone_a.len(), 50);
    assert_eq!(together[0], alone_a);
    assert_eq!(together[1], alone_b);
}
