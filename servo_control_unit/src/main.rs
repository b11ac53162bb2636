//! # Servo Control Unit
//!
//! Runs the configured axes against simulated motor plants under the
//! cooperative scheduler. Telemetry lines go to stdout (or one file per
//! axis with `--telemetry-dir`); logs go to stderr.
//!
//! On Ctrl-C, on `--duration-ms` expiry, or once every task has faulted,
//! all actuators are driven to the safe state before the scheduler report
//! is printed.

use clap::Parser;
use servo_common::config::{LogLevel, ServoConfig};
use servo_common::consts::DEFAULT_CONFIG_PATH;
use servo_common::hal::MonotonicClock;
use servo_control_unit::config::load_config;
use servo_control_unit::cycle::{AxisHardware, AxisTask};
use servo_control_unit::scheduler::Scheduler;
use servo_control_unit::telemetry::{TelemetryTask, telemetry_channel};
use servo_hal::{MotorModel, SimAxis, SystemClock};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Servo Control Unit: cooperative closed-loop position control
#[derive(Parser, Debug)]
#[command(name = "servo_control_unit")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Closed-loop motor position control on simulated hardware")]
struct Args {
    /// Path to the servo configuration TOML.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Stop after this many milliseconds (default: run until Ctrl-C).
    #[arg(long, value_name = "MS")]
    duration_ms: Option<u32>,

    /// Write telemetry to `<DIR>/<axis>.csv` instead of stdout.
    #[arg(long, value_name = "DIR")]
    telemetry_dir: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let config = load_config(&args.config);
    let log_level = config
        .as_ref()
        .map_or(LogLevel::default(), |c| c.shared.log_level);
    setup_tracing(&args, log_level);

    info!("Servo Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("FATAL: {} ({})", e, args.config.display());
            process::exit(1);
        }
    };

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Servo Control Unit shutdown complete");
}

fn run(args: &Args, config: &ServoConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Config OK: service={}, axes={}, telemetry={}",
        config.shared.service_name,
        config.axes.len(),
        config.telemetry.enabled
    );

    if stdout_is_shared(args.telemetry_dir.as_deref(), config) {
        warn!(
            "Telemetry of {} axes interleaves on stdout; use --telemetry-dir to separate it",
            config.axes.len()
        );
    }

    let clock = SystemClock::new();
    let mut scheduler = Scheduler::new(&clock);
    let mut plants = Vec::with_capacity(config.axes.len());

    for axis in &config.axes {
        let plant = SimAxis::new(MotorModel::default(), axis.counts_per_rev, axis.counter_period);
        let hardware = AxisHardware {
            timer: plant.counter(),
            forward: plant.forward_channel(),
            reverse: plant.reverse_channel(),
            enable: plant.enable_pin(),
        };
        let mut task = AxisTask::new(axis, hardware, &clock)?;

        if config.telemetry.enabled {
            let (producer, consumer) = telemetry_channel(config.telemetry.queue_capacity);
            task = task.with_telemetry(producer);
            let sink = telemetry_sink(args.telemetry_dir.as_deref(), &axis.name)?;
            let drain = TelemetryTask::from_config(
                format!("{}-telemetry", axis.name),
                consumer,
                sink,
                &config.telemetry,
            );
            scheduler.add(
                Box::new(drain),
                config.telemetry.priority,
                config.telemetry.period_ms,
            );
        }
        scheduler.add(Box::new(task), axis.priority, axis.period_ms);
        plants.push(plant);
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    info!("Entering control loop");
    let started = clock.now_ms();
    let mut last = started;
    while running.load(Ordering::SeqCst) {
        scheduler.poll();
        if !scheduler.has_active() {
            warn!("All tasks faulted");
            break;
        }

        let now = clock.now_ms();
        let dt = Duration::from_millis(clock.diff_ms(now, last).max(0) as u64);
        for plant in &plants {
            plant.advance(dt);
        }
        last = now;

        let elapsed = clock.diff_ms(now, started);
        if duration_reached(elapsed, args.duration_ms) {
            info!("Run duration reached ({} ms)", elapsed);
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }
    if !running.load(Ordering::SeqCst) {
        info!("Received shutdown signal");
    }

    let stopped = scheduler.shutdown();
    let report = scheduler.report();
    eprint!("{report}");
    stopped?;

    let faulted = report.rows.iter().filter(|r| r.fault.is_some()).count();
    if faulted > 0 {
        return Err(format!("{faulted} task(s) faulted").into());
    }
    Ok(())
}

/// `--duration-ms` expiry; a negative elapsed time never expires it.
fn duration_reached(elapsed_ms: i32, limit_ms: Option<u32>) -> bool {
    limit_ms.is_some_and(|limit| u32::try_from(elapsed_ms).is_ok_and(|e| e >= limit))
}

/// True when several axes would write unlabelled telemetry to stdout.
fn stdout_is_shared(dir: Option<&Path>, config: &ServoConfig) -> bool {
    dir.is_none() && config.telemetry.enabled && config.axes.len() > 1
}

/// Telemetry destination for one axis.
fn telemetry_sink(dir: Option<&Path>, axis: &str) -> io::Result<Box<dyn Write>> {
    match dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(format!("{axis}.csv"));
            info!("Telemetry for '{}' -> {}", axis, path.display());
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

fn setup_tracing(args: &Args, level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        level.as_directive()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
