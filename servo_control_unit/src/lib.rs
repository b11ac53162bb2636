//! # Servo Control Unit Library
//!
//! Closed-loop position control for DC gear motors with quadrature
//! encoders. Each axis runs a periodic control task under a single-threaded
//! cooperative scheduler and publishes telemetry through bounded queues to a
//! consumer task that writes `<time_ms>, <position_deg>` lines.
//!
//! ## Data Flow
//!
//! ```text
//! TimerCounter ─► QuadratureDecoder ─► PositionController ─► PwmActuator ─► PwmChannel ×2
//!                                             │                                 EnablePin
//!                                             ▼
//!                             TelemetryProducer ═► queues ═► TelemetryTask ─► io::Write
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] - Wraparound-corrected position counter
//! - [`control`] - PID controller and saturating PWM actuator
//! - [`telemetry`] - Drop-on-full queues and the consumer task
//! - [`cycle`] - Per-axis control task
//! - [`scheduler`] - Cooperative periodic scheduler with safe-stop
//! - [`config`] - TOML loading and validation
//! - [`error`] - `ControlError`

pub mod config;
pub mod control;
pub mod cycle;
pub mod encoder;
pub mod error;
pub mod scheduler;
pub mod telemetry;

pub use crate::cycle::{AxisHardware, AxisSnapshot, AxisTask};
pub use crate::error::ControlError;
pub use crate::scheduler::{CooperativeTask, Scheduler};
