//! Integration test: fault isolation and safe stop.
//!
//! Validates:
//! 1. A faulted axis is stopped by the scheduler while the other keeps running
//! 2. NaN effort forces both channels to zero and faults only its axis
//! 3. Shutdown drives every actuator to the safe state, even after faults

use super::{axis_config, run_ms, sim_axis};
use servo_common::hal::DutyCommand;
use servo_control_unit::error::ControlError;
use servo_control_unit::scheduler::{Scheduler, TaskState};
use servo_hal::SimClock;

#[test]
fn hardware_fault_stops_only_the_faulted_axis() {
    let clock = SimClock::default();
    let mut scheduler = Scheduler::new(clock.clone());
    let (plant_a, task_a) = sim_axis(&axis_config("a", 720.0, 1.5, 0.0, 0.0), &clock);
    let (plant_b, task_b) = sim_axis(&axis_config("b", 720.0, 1.5, 0.0, 0.0), &clock);
    let id_a = scheduler.add(Box::new(task_a), 2, 20);
    let id_b = scheduler.add(Box::new(task_b), 1, 20);
    let plants = [plant_a.clone(), plant_b.clone()];

    run_ms(&mut scheduler, &clock, &plants, 100);
    let angle_a = plant_a.angle_deg();
    assert!(angle_a > 0.0);

    plant_a.set_fault(Some("encoder cable"));
    run_ms(&mut scheduler, &clock, &plants, 40);
    assert_eq!(scheduler.state(id_a), Some(TaskState::Faulted));
    assert!(matches!(
        scheduler.fault_of(id_a),
        Some(ControlError::HardwareFault(_))
    ));
    assert_eq!(scheduler.state(id_b), Some(TaskState::Active));

    // Axis b keeps moving; faulted axis a is never stepped again.
    let runs_a = scheduler.stats(id_a).unwrap().activations;
    let angle_b = plant_b.angle_deg();
    plant_a.set_fault(None);
    run_ms(&mut scheduler, &clock, &plants, 200);
    assert_eq!(scheduler.stats(id_a).unwrap().activations, runs_a);
    assert!(plant_b.angle_deg() > angle_b);

    scheduler.shutdown().unwrap();
    assert_eq!(plant_a.duty(), DutyCommand::SAFE);
    assert_eq!(plant_b.duty(), DutyCommand::SAFE);
}

#[test]
fn nan_effort_zeroes_outputs_and_faults_axis() {
    let clock = SimClock::default();
    let mut scheduler = Scheduler::new(clock.clone());
    let (plant_bad, task_bad) = sim_axis(&axis_config("bad", f64::NAN, 1.5, 0.0, 0.0), &clock);
    let (plant_ok, task_ok) = sim_axis(&axis_config("ok", 90.0, 1.5, 0.0, 0.0), &clock);
    let bad = scheduler.add(Box::new(task_bad), 1, 20);
    let ok = scheduler.add(Box::new(task_ok), 1, 20);
    let plants = [plant_bad.clone(), plant_ok.clone()];

    run_ms(&mut scheduler, &clock, &plants, 100);

    assert!(matches!(
        scheduler.fault_of(bad),
        Some(ControlError::InvalidCommand { .. })
    ));
    assert_eq!(plant_bad.duty(), DutyCommand::SAFE);
    assert_eq!(plant_bad.angle_deg(), 0.0);
    assert_eq!(scheduler.state(ok), Some(TaskState::Active));
    assert!(plant_ok.angle_deg() > 0.0);
}

#[test]
fn direct_tick_with_nan_setpoint_reports_invalid_command() {
    let clock = SimClock::default();
    let (plant, mut task) = sim_axis(&axis_config("x", 90.0, 1.5, 0.0, 0.0), &clock);
    task.tick().unwrap();
    assert!(plant.duty().forward > 0.0);

    task.controller_mut().set_setpoint(f64::NAN);
    assert!(matches!(task.tick(), Err(ControlError::InvalidCommand { .. })));
    let duty = plant.duty();
    assert_eq!((duty.forward, duty.reverse), (0.0, 0.0));
}

#[test]
fn shutdown_mid_motion_drives_all_outputs_safe() {
    let clock = SimClock::default();
    let mut scheduler = Scheduler::new(clock.clone());
    let (plant_a, task_a) = sim_axis(&axis_config("a", 180.0, 1.5, 0.0, 0.0), &clock);
    let (plant_b, task_b) = sim_axis(&axis_config("b", -180.0, 1.5, 0.0, 0.0), &clock);
    scheduler.add(Box::new(task_a), 1, 20);
    scheduler.add(Box::new(task_b), 2, 20);
    let plants = [plant_a.clone(), plant_b.clone()];

    run_ms(&mut scheduler, &clock, &plants, 60);
    assert!(plant_a.duty().forward > 0.0);
    assert!(plant_b.duty().reverse > 0.0);

    scheduler.shutdown().unwrap();
    assert_eq!(plant_a.duty(), DutyCommand::SAFE);
    assert_eq!(plant_b.duty(), DutyCommand::SAFE);
}

#[test]
fn shutdown_reports_failure_but_still_stops_others() {
    let clock = SimClock::default();
    let mut scheduler = Scheduler::new(clock.clone());
    let (plant_a, task_a) = sim_axis(&axis_config("a", 180.0, 1.5, 0.0, 0.0), &clock);
    let (plant_b, task_b) = sim_axis(&axis_config("b", 180.0, 1.5, 0.0, 0.0), &clock);
    scheduler.add(Box::new(task_a), 2, 20);
    scheduler.add(Box::new(task_b), 1, 20);
    let plants = [plant_a.clone(), plant_b.clone()];

    run_ms(&mut scheduler, &clock, &plants, 40);
    plant_a.set_fault(Some("driver brownout"));

    let err = scheduler.shutdown().unwrap_err();
    assert!(matches!(err, ControlError::HardwareFault(_)));
    assert_eq!(plant_b.duty(), DutyCommand::SAFE);
}
