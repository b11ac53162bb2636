//! Cooperative, priority-ordered periodic scheduler.
//!
//! Tasks run to completion on the calling thread. Each call to
//! [`Scheduler::poll`] activates every task whose next release time has
//! passed, highest priority first, ties in registration order. A task that
//! returns an error is faulted: its outputs are driven to the safe state,
//! the error is logged and kept, and the task is never stepped again. Other
//! tasks keep running.
//!
//! Release times advance by exactly one period per activation. When a task
//! falls a whole period or more behind, the missed releases are skipped and
//! counted as late.

use servo_common::hal::MonotonicClock;
use std::fmt;
use tracing::{error, info, warn};

use crate::error::ControlError;

/// A unit of work driven by the scheduler.
pub trait CooperativeTask {
    /// Identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Perform one bounded activation and return.
    fn step(&mut self) -> Result<(), ControlError>;

    /// Drive any owned outputs to their safe state.
    fn safe_stop(&mut self) -> Result<(), ControlError> {
        Ok(())
    }
}

/// Handle returned by [`Scheduler::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(usize);

/// Lifecycle of a registered task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Waiting for its next release.
    Active,
    /// Stopped after an error; never stepped again.
    Faulted,
}

/// Activation statistics of one task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Completed activations (including the faulting one).
    pub activations: u64,
    /// Activations that started a whole period or more after release.
    pub late_activations: u64,
    /// Largest observed release-to-start delay [ms].
    pub max_lateness_ms: u32,
}

struct TaskSlot<'a> {
    task: Box<dyn CooperativeTask + 'a>,
    priority: u8,
    period_ms: u32,
    next_release_ms: Option<u32>,
    state: TaskState,
    stats: TaskStats,
    fault: Option<ControlError>,
}

/// Cooperative scheduler over boxed tasks.
pub struct Scheduler<'a, C> {
    clock: C,
    slots: Vec<TaskSlot<'a>>,
    /// Slot indices sorted by descending priority, stable on ties.
    order: Vec<usize>,
}

impl<'a, C: MonotonicClock> Scheduler<'a, C> {
    /// Create an empty scheduler using `clock` for release times.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            slots: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Register a task. Higher `priority` runs first within one poll.
    ///
    /// The first activation happens on the next poll.
    pub fn add(
        &mut self,
        task: Box<dyn CooperativeTask + 'a>,
        priority: u8,
        period_ms: u32,
    ) -> TaskId {
        let index = self.slots.len();
        info!(task = task.name(), priority, period_ms, "Task registered");
        self.slots.push(TaskSlot {
            task,
            priority,
            period_ms,
            next_release_ms: None,
            state: TaskState::Active,
            stats: TaskStats::default(),
            fault: None,
        });
        let slots = &self.slots;
        self.order.push(index);
        self.order
            .sort_by(|&a, &b| slots[b].priority.cmp(&slots[a].priority).then(a.cmp(&b)));
        TaskId(index)
    }

    /// Activate every released task once, at the clock's current time.
    ///
    /// Returns the number of tasks stepped.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now_ms();
        let mut stepped = 0;
        for &index in &self.order {
            let slot = &mut self.slots[index];
            if slot.state == TaskState::Faulted {
                continue;
            }
            let release = slot.next_release_ms.unwrap_or(now);
            let lateness = self.clock.diff_ms(now, release);
            if lateness < 0 {
                continue;
            }
            let lateness = lateness as u32;

            slot.stats.activations += 1;
            slot.stats.max_lateness_ms = slot.stats.max_lateness_ms.max(lateness);
            let mut next = release.wrapping_add(slot.period_ms);
            if slot.period_ms == 0 || lateness >= slot.period_ms {
                if slot.period_ms > 0 {
                    slot.stats.late_activations += 1;
                }
                next = now.wrapping_add(slot.period_ms);
            }
            slot.next_release_ms = Some(next);
            stepped += 1;

            if let Err(e) = slot.task.step() {
                Self::fault(slot, e);
            }
        }
        stepped
    }

    fn fault(slot: &mut TaskSlot<'_>, err: ControlError) {
        error!(task = slot.task.name(), "Task faulted: {}", err);
        slot.state = TaskState::Faulted;
        if let Err(stop_err) = slot.task.safe_stop() {
            error!(task = slot.task.name(), "Safe stop failed: {}", stop_err);
        }
        slot.fault = Some(err);
    }

    /// Drive every task to its safe state, faulted or not.
    ///
    /// All tasks are attempted; the first failure is returned.
    pub fn shutdown(&mut self) -> Result<(), ControlError> {
        let mut first_err = None;
        for slot in &mut self.slots {
            if let Err(e) = slot.task.safe_stop() {
                warn!(task = slot.task.name(), "Safe stop failed: {}", e);
                first_err.get_or_insert(e);
            }
        }
        info!(tasks = self.slots.len(), "Scheduler shut down");
        first_err.map_or(Ok(()), Err)
    }

    // ─── Queries ────────────────────────────────────────────────────

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True while at least one task is still active.
    pub fn has_active(&self) -> bool {
        self.slots.iter().any(|s| s.state == TaskState::Active)
    }

    pub fn state(&self, id: TaskId) -> Option<TaskState> {
        self.slots.get(id.0).map(|s| s.state)
    }

    pub fn stats(&self, id: TaskId) -> Option<TaskStats> {
        self.slots.get(id.0).map(|s| s.stats)
    }

    /// Error that faulted the task, if any.
    pub fn fault_of(&self, id: TaskId) -> Option<&ControlError> {
        self.slots.get(id.0).and_then(|s| s.fault.as_ref())
    }

    /// Shared access to the scheduler clock.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Snapshot of every task for logging or printing.
    pub fn report(&self) -> SchedulerReport {
        SchedulerReport {
            rows: self
                .order
                .iter()
                .map(|&i| {
                    let s = &self.slots[i];
                    TaskReport {
                        name: s.task.name().to_string(),
                        priority: s.priority,
                        period_ms: s.period_ms,
                        state: s.state,
                        stats: s.stats,
                        fault: s.fault.as_ref().map(ToString::to_string),
                    }
                })
                .collect(),
        }
    }
}

/// One row of a [`SchedulerReport`].
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub name: String,
    pub priority: u8,
    pub period_ms: u32,
    pub state: TaskState,
    pub stats: TaskStats,
    pub fault: Option<String>,
}

/// Per-task summary in priority order.
#[derive(Debug, Clone)]
pub struct SchedulerReport {
    pub rows: Vec<TaskReport>,
}

impl fmt::Display for SchedulerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<20} {:>4} {:>8} {:>10} {:>6} {:>8}  state",
            "task", "prio", "period", "runs", "late", "max_late"
        )?;
        for r in &self.rows {
            write!(
                f,
                "{:<20} {:>4} {:>6}ms {:>10} {:>6} {:>6}ms  ",
                r.name,
                r.priority,
                r.period_ms,
                r.stats.activations,
                r.stats.late_activations,
                r.stats.max_lateness_ms
            )?;
            match &r.fault {
                Some(e) => writeln!(f, "faulted ({e})")?,
                None => writeln!(f, "active")?,
            }
        }
        Ok(())
    }
}
