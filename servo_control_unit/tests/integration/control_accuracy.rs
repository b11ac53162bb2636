//! Integration test: closed-loop convergence on a simulated motor.
//!
//! Setpoint 90°, kp = 1.63, ki = 0, kd = 0.3, starting at rest at 0°, one
//! control pass every 10 ms.

use super::{axis_config, sim_axis};
use servo_hal::SimClock;
use std::time::Duration;

const TICK_MS: u32 = 10;
const TOLERANCE_DEG: f64 = 0.5;

#[test]
fn effort_shrinks_as_error_shrinks_and_settles() {
    let clock = SimClock::default();
    let cfg = axis_config("pitch", 90.0, 1.63, 0.0, 0.3);
    let (plant, mut task) = sim_axis(&cfg, &clock);

    let mut prev: Option<(f64, f64)> = None;
    let mut settled_at = None;
    let mut monotone_checks = 0;

    for n in 0..500 {
        let snap = task.tick().unwrap();
        let (err, effort) = (snap.error_deg, snap.effort);

        if let Some((prev_err, prev_effort)) = prev {
            let same_side = err.signum() == prev_err.signum();
            if same_side && err.abs() >= 1.0 && err.abs() < prev_err.abs() {
                assert!(
                    effort.abs() < prev_effort.abs(),
                    "tick {n}: |err| {prev_err} -> {err} but |effort| {prev_effort} -> {effort}"
                );
                monotone_checks += 1;
            }
        }
        prev = Some((err, effort));

        if err.abs() < TOLERANCE_DEG {
            settled_at.get_or_insert(n);
        }

        plant.advance(Duration::from_millis(TICK_MS as u64));
        clock.advance(TICK_MS);
    }

    assert!(monotone_checks > 10);
    let settled_at = settled_at.expect("never settled");
    assert!(settled_at < 200, "settled only at tick {settled_at}");
    assert!((task.controller().position() - 90.0).abs() < TOLERANCE_DEG);
    assert!((plant.angle_deg() - 90.0).abs() < TOLERANCE_DEG);
}

#[test]
fn stays_settled_once_converged() {
    let clock = SimClock::default();
    let cfg = axis_config("pitch", 90.0, 1.63, 0.0, 0.3);
    let (plant, mut task) = sim_axis(&cfg, &clock);

    for n in 0..500 {
        let snap = task.tick().unwrap();
        if n >= 300 {
            assert!(snap.error_deg.abs() < TOLERANCE_DEG, "tick {n}: {}", snap.error_deg);
            assert!(snap.duty.forward < 5.0 && snap.duty.reverse < 5.0);
        }
        plant.advance(Duration::from_millis(TICK_MS as u64));
        clock.advance(TICK_MS);
    }
}

#[test]
fn measured_position_tracks_plant() {
    let clock = SimClock::default();
    let cfg = axis_config("yaw", -270.0, 1.5, 0.0, 0.0);
    let (plant, mut task) = sim_axis(&cfg, &clock);
    let count_deg = cfg.degrees_per_count();

    for _ in 0..200 {
        let before = plant.angle_deg();
        let snap = task.tick().unwrap();
        assert!((snap.position_deg - before).abs() <= count_deg + 1e-9);
        plant.advance(Duration::from_millis(TICK_MS as u64));
        clock.advance(TICK_MS);
    }
    assert!((plant.angle_deg() + 270.0).abs() < TOLERANCE_DEG);
}

#[test]
fn setpoint_change_is_followed() {
    let clock = SimClock::default();
    let cfg = axis_config("roll", 180.0, 1.5, 0.0, 0.0);
    let (plant, mut task) = sim_axis(&cfg, &clock);

    let run = |task: &mut super::SimTask, ticks: u32| {
        for _ in 0..ticks {
            task.tick().unwrap();
            plant.advance(Duration::from_millis(TICK_MS as u64));
            clock.advance(TICK_MS);
        }
    };
    run(&mut task, 200);
    assert!((task.controller().position() - 180.0).abs() < TOLERANCE_DEG);

    task.controller_mut().set_setpoint(360.0);
    run(&mut task, 200);
    assert!((task.controller().position() - 360.0).abs() < TOLERANCE_DEG);
}
