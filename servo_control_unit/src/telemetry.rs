//! Telemetry path from control loops to a text sink.
//!
//! Each axis publishes one [`TelemetrySample`] per tick into a pair of
//! bounded queues (time and position). A consumer task removes samples in
//! pairs, only when both queues hold an entry, and writes one line per
//! sample:
//!
//! ```text
//! <time_ms>, <position_deg>
//! ```
//!
//! Producer and consumer share the queues through `Rc<RefCell<_>>`; both
//! run on the single cooperative scheduler thread and never hold a borrow
//! across a yield.

pub mod consumer;
pub mod queue;

pub use consumer::TelemetryTask;
pub use queue::BoundedQueue;

use servo_common::consts::MAX_TELEMETRY_QUEUE_CAPACITY;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One published control-loop observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    /// Controller elapsed time [ms].
    pub timestamp_ms: u32,
    /// Measured shaft position [deg].
    pub position_deg: f64,
}

impl fmt::Display for TelemetrySample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {:.3}", self.timestamp_ms, self.position_deg)
    }
}

#[derive(Debug)]
struct TelemetryQueues {
    time: BoundedQueue<u32, MAX_TELEMETRY_QUEUE_CAPACITY>,
    position: BoundedQueue<f64, MAX_TELEMETRY_QUEUE_CAPACITY>,
}

type SharedQueues = Rc<RefCell<TelemetryQueues>>;

/// Create a connected producer/consumer pair with `capacity` slots per queue.
pub fn telemetry_channel(capacity: usize) -> (TelemetryProducer, TelemetryConsumer) {
    let queues = Rc::new(RefCell::new(TelemetryQueues {
        time: BoundedQueue::new(capacity),
        position: BoundedQueue::new(capacity),
    }));
    (
        TelemetryProducer {
            queues: Rc::clone(&queues),
        },
        TelemetryConsumer { queues },
    )
}

/// Publishing side, owned by a control-loop task.
#[derive(Debug, Clone)]
pub struct TelemetryProducer {
    queues: SharedQueues,
}

impl TelemetryProducer {
    /// Offer a sample without blocking.
    ///
    /// Each queue accepts or drops its half independently. Returns `true`
    /// only if both halves were stored.
    pub fn publish(&self, sample: TelemetrySample) -> bool {
        let Ok(mut q) = self.queues.try_borrow_mut() else {
            return false;
        };
        let time = q.time.push(sample.timestamp_ms);
        let position = q.position.push(sample.position_deg);
        time && position
    }
}

/// Draining side, owned by a telemetry task.
#[derive(Debug)]
pub struct TelemetryConsumer {
    queues: SharedQueues,
}

impl TelemetryConsumer {
    /// Remove the oldest pair if both queues hold an entry.
    pub fn pop_pair(&self) -> Option<TelemetrySample> {
        let mut q = self.queues.try_borrow_mut().ok()?;
        if q.time.is_empty() || q.position.is_empty() {
            return None;
        }
        let timestamp_ms = q.time.pop()?;
        let position_deg = q.position.pop()?;
        Some(TelemetrySample {
            timestamp_ms,
            position_deg,
        })
    }

    /// Both queues are at capacity.
    pub fn is_full(&self) -> bool {
        self.queues
            .try_borrow()
            .is_ok_and(|q| q.time.is_full() && q.position.is_full())
    }

    /// Number of complete pairs waiting.
    pub fn pending(&self) -> usize {
        self.queues
            .try_borrow()
            .map_or(0, |q| q.time.len().min(q.position.len()))
    }

    /// Samples dropped by the producer so far (time and position queues).
    pub fn dropped(&self) -> (u64, u64) {
        self.queues
            .try_borrow()
            .map_or((0, 0), |q| (q.time.dropped(), q.position.dropped()))
    }

    /// Per-queue capacity.
    pub fn capacity(&self) -> usize {
        self.queues.try_borrow().map_or(0, |q| q.time.capacity())
    }
}
