//! Integration test: telemetry from a scheduled axis to a text sink.

use super::{SharedSink, axis_config, run_ms, sim_axis};
use servo_common::config::DrainPolicy;
use servo_control_unit::scheduler::Scheduler;
use servo_control_unit::telemetry::{TelemetryTask, telemetry_channel};
use servo_hal::SimClock;

fn parse(line: &str) -> (u32, f64) {
    let (t, p) = line.split_once(", ").expect("missing separator");
    (t.parse().unwrap(), p.parse().unwrap())
}

#[test]
fn continuous_drain_emits_every_sample_in_order() {
    let clock = SimClock::default();
    let mut scheduler = Scheduler::new(clock.clone());
    let (plant, task) = sim_axis(&axis_config("a", 180.0, 1.5, 0.0, 0.0), &clock);
    let (tx, rx) = telemetry_channel(75);
    let sink = SharedSink::default();
    scheduler.add(Box::new(task.with_telemetry(tx)), 1, 20);
    scheduler.add(
        Box::new(TelemetryTask::new("a-telemetry", rx, sink.clone(), DrainPolicy::Continuous)),
        3,
        10,
    );

    run_ms(&mut scheduler, &clock, &[plant.clone()], 2_000);
    scheduler.shutdown().unwrap();

    let samples: Vec<_> = sink.lines().iter().map(|l| parse(l)).collect();
    assert_eq!(samples.len(), 100);
    for (i, (t, _)) in samples.iter().enumerate() {
        assert_eq!(*t, i as u32 * 20);
    }
    assert_eq!(samples[0].1, 0.0);
    let (_, last_pos) = samples[samples.len() - 1];
    assert!((last_pos - 180.0).abs() < 0.5);
}

#[test]
fn when_full_waits_then_drains() {
    let clock = SimClock::default();
    let mut scheduler = Scheduler::new(clock.clone());
    let (plant, task) = sim_axis(&axis_config("a", 90.0, 1.5, 0.0, 0.0), &clock);
    let (tx, rx) = telemetry_channel(5);
    let sink = SharedSink::default();
    scheduler.add(Box::new(task.with_telemetry(tx)), 1, 20);
    scheduler.add(
        Box::new(TelemetryTask::new("a-telemetry", rx, sink.clone(), DrainPolicy::WhenFull)),
        3,
        10,
    );
    let plants = [plant];

    // Samples at 0, 20, 40, 60: not full yet.
    run_ms(&mut scheduler, &clock, &plants, 70);
    assert!(sink.lines().is_empty());

    // Fifth sample at 80 fills both queues; drain starts at 90.
    run_ms(&mut scheduler, &clock, &plants, 21);
    assert_eq!(sink.lines(), ["0, 0.000"]);

    run_ms(&mut scheduler, &clock, &plants, 200);
    let times: Vec<u32> = sink.lines().iter().map(|l| parse(l).0).collect();
    assert!(times.len() >= 5);
    assert!(times.windows(2).all(|w| w[1] == w[0] + 20));
}

#[test]
fn slow_consumer_drops_samples_without_slowing_control() {
    let clock = SimClock::default();
    let mut scheduler = Scheduler::new(clock.clone());
    let (plant, task) = sim_axis(&axis_config("a", 90.0, 1.5, 0.0, 0.0), &clock);
    let (tx, rx) = telemetry_channel(3);
    let sink = SharedSink::default();
    let axis = scheduler.add(Box::new(task.with_telemetry(tx)), 1, 10);
    scheduler.add(
        Box::new(TelemetryTask::new("a-telemetry", rx, sink.clone(), DrainPolicy::Continuous)),
        3,
        100,
    );

    run_ms(&mut scheduler, &clock, &[plant.clone()], 1_000);

    let stats = scheduler.stats(axis).unwrap();
    assert_eq!(stats.activations, 100);
    assert_eq!(stats.late_activations, 0);
    // The consumer's first activation at t=0 finds the queues still empty.
    assert_eq!(sink.lines().len(), 9);
    assert!((plant.angle_deg() - 90.0).abs() < 0.5);
}
