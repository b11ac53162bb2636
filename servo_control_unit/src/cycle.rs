//! Per-axis control cycle: read → compute → actuate → publish.
//!
//! One activation of an [`AxisTask`] performs exactly one pass:
//!
//! 1. Read the accumulated encoder count and convert it to degrees.
//! 2. Run the position controller on the measured angle.
//! 3. Apply the effort through the saturating actuator.
//! 4. Offer a telemetry sample without blocking (dropped if full).
//!
//! The task then returns control to the scheduler. Any capability error
//! aborts the pass and is returned; the scheduler then stops this axis and
//! leaves the others running.

use servo_common::config::AxisConfig;
use servo_common::hal::{DutyCommand, EnablePin, MonotonicClock, PwmChannel, TimerCounter};
use tracing::{debug, trace};

use crate::control::{PositionController, PwmActuator};
use crate::encoder::{QuadratureDecoder, counts_to_degrees};
use crate::error::ControlError;
use crate::scheduler::CooperativeTask;
use crate::telemetry::{TelemetryProducer, TelemetrySample};

/// Capabilities owned by one axis.
#[derive(Debug)]
pub struct AxisHardware<T, P, E> {
    /// Encoder timer-counter.
    pub timer: T,
    /// Forward PWM channel.
    pub forward: P,
    /// Reverse PWM channel.
    pub reverse: P,
    /// Motor driver enable line.
    pub enable: E,
}

/// Result of one control pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSnapshot {
    /// Measured shaft angle [deg].
    pub position_deg: f64,
    /// `setpoint − position` [deg].
    pub error_deg: f64,
    /// Unsaturated controller output.
    pub effort: f64,
    /// Outputs actually applied.
    pub duty: DutyCommand,
    /// Controller elapsed time [ms].
    pub elapsed_ms: u32,
    /// The telemetry sample was accepted by both queues.
    pub published: bool,
}

/// Counters kept by an axis task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisStats {
    /// Completed control passes.
    pub ticks: u64,
    /// Telemetry samples dropped because a queue was full.
    pub telemetry_dropped: u64,
}

/// Closed-loop position control task for one axis.
#[derive(Debug)]
pub struct AxisTask<T, P, E, C> {
    name: String,
    counts_per_rev: u32,
    decoder: QuadratureDecoder<T>,
    controller: PositionController<C>,
    actuator: PwmActuator<P, E>,
    telemetry: Option<TelemetryProducer>,
    stats: AxisStats,
}

impl<T, P, E, C> AxisTask<T, P, E, C>
where
    T: TimerCounter,
    P: PwmChannel,
    E: EnablePin,
    C: MonotonicClock,
{
    /// Bind hardware to a controller built from `config`.
    ///
    /// Zeroes the encoder counter and puts the outputs into the safe state.
    ///
    /// # Errors
    ///
    /// `HardwareFault` if any capability rejects its initial write.
    pub fn new(
        config: &AxisConfig,
        hardware: AxisHardware<T, P, E>,
        clock: C,
    ) -> Result<Self, ControlError> {
        let decoder = QuadratureDecoder::new(hardware.timer)?;
        let actuator = PwmActuator::new(hardware.forward, hardware.reverse, hardware.enable)?;
        debug!(
            axis = %config.name,
            setpoint_deg = config.setpoint_deg,
            kp = config.kp,
            ki = config.ki,
            kd = config.kd,
            "Axis task created"
        );
        Ok(Self {
            name: config.name.clone(),
            counts_per_rev: config.counts_per_rev,
            decoder,
            controller: PositionController::from_config(config, clock),
            actuator,
            telemetry: None,
            stats: AxisStats::default(),
        })
    }

    /// Publish one sample per pass into `producer`.
    pub fn with_telemetry(mut self, producer: TelemetryProducer) -> Self {
        self.telemetry = Some(producer);
        self
    }

    /// Run one control pass.
    pub fn tick(&mut self) -> Result<AxisSnapshot, ControlError> {
        let counts = self.decoder.read()?;
        let position_deg = counts_to_degrees(counts, self.counts_per_rev);
        let effort = self.controller.run(position_deg);
        let duty = self.actuator.set_duty_cycle(effort)?;

        let published = match &self.telemetry {
            Some(producer) => producer.publish(TelemetrySample {
                timestamp_ms: self.controller.elapsed_ms(),
                position_deg,
            }),
            None => false,
        };
        if self.telemetry.is_some() && !published {
            self.stats.telemetry_dropped += 1;
        }
        self.stats.ticks += 1;

        trace!(
            axis = %self.name,
            position_deg,
            effort,
            duty = duty.signed_percent(),
            "Control pass"
        );
        Ok(AxisSnapshot {
            position_deg,
            error_deg: self.controller.error(),
            effort,
            duty,
            elapsed_ms: self.controller.elapsed_ms(),
            published,
        })
    }

    /// Re-reference the axis: current shaft position becomes 0 counts.
    pub fn zero_encoder(&mut self) -> Result<(), ControlError> {
        self.decoder.zero()?;
        Ok(())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn stats(&self) -> AxisStats {
        self.stats
    }

    #[inline]
    pub fn controller(&self) -> &PositionController<C> {
        &self.controller
    }

    /// Mutable controller access for setpoint and gain changes.
    #[inline]
    pub fn controller_mut(&mut self) -> &mut PositionController<C> {
        &mut self.controller
    }

    #[inline]
    pub fn actuator(&self) -> &PwmActuator<P, E> {
        &self.actuator
    }
}

impl<T, P, E, C> CooperativeTask for AxisTask<T, P, E, C>
where
    T: TimerCounter,
    P: PwmChannel,
    E: EnablePin,
    C: MonotonicClock,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self) -> Result<(), ControlError> {
        self.tick().map(|_| ())
    }

    fn safe_stop(&mut self) -> Result<(), ControlError> {
        self.actuator.disable()?;
        debug!(axis = %self.name, ticks = self.stats.ticks, "Axis outputs disabled");
        Ok(())
    }
}
