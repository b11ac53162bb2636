//! Telemetry consumer task.
//!
//! Moves at most one sample per activation from the queue pair to a text
//! sink, so a slow sink never holds the scheduler for more than one write.

use servo_common::config::{DrainPolicy, TelemetryConfig};
use std::io::Write;
use tracing::debug;

use super::{TelemetryConsumer, TelemetrySample};
use crate::error::ControlError;
use crate::scheduler::CooperativeTask;

/// Writes paired samples as `<time_ms>, <position_deg>` lines.
#[derive(Debug)]
pub struct TelemetryTask<W> {
    name: String,
    consumer: TelemetryConsumer,
    sink: W,
    policy: DrainPolicy,
    draining: bool,
    emitted: u64,
}

impl<W: Write> TelemetryTask<W> {
    /// Create a consumer task draining `consumer` into `sink`.
    pub fn new(
        name: impl Into<String>,
        consumer: TelemetryConsumer,
        sink: W,
        policy: DrainPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            consumer,
            sink,
            policy,
            draining: false,
            emitted: 0,
        }
    }

    /// Create a consumer task using the configured drain policy.
    pub fn from_config(
        name: impl Into<String>,
        consumer: TelemetryConsumer,
        sink: W,
        config: &TelemetryConfig,
    ) -> Self {
        Self::new(name, consumer, sink, config.drain)
    }

    /// Emit at most one sample. Returns the sample written, if any.
    ///
    /// # Errors
    ///
    /// `ControlError::Telemetry` if the sink rejects the line. The sample
    /// is lost in that case.
    pub fn drain_once(&mut self) -> Result<Option<TelemetrySample>, ControlError> {
        if self.policy == DrainPolicy::WhenFull && !self.draining {
            if !self.consumer.is_full() {
                return Ok(None);
            }
            debug!(task = %self.name, "Telemetry queues full, draining");
            self.draining = true;
        }

        let Some(sample) = self.consumer.pop_pair() else {
            self.draining = false;
            return Ok(None);
        };
        writeln!(self.sink, "{sample}")?;
        self.emitted += 1;
        Ok(Some(sample))
    }

    /// Lines written so far.
    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Queue pair being drained.
    #[inline]
    pub fn consumer(&self) -> &TelemetryConsumer {
        &self.consumer
    }

    /// Release the sink.
    pub fn into_sink(self) -> W {
        self.sink
    }
}

impl<W: Write> CooperativeTask for TelemetryTask<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self) -> Result<(), ControlError> {
        self.drain_once().map(|_| ())
    }

    fn safe_stop(&mut self) -> Result<(), ControlError> {
        let (time_dropped, position_dropped) = self.consumer.dropped();
        debug!(
            task = %self.name,
            emitted = self.emitted,
            pending = self.consumer.pending(),
            time_dropped,
            position_dropped,
            "Telemetry stopped"
        );
        self.sink.flush()?;
        Ok(())
    }
}
