//! HAL command types shared by the control core and drivers.

/// Physical output applied to a two-channel (H-bridge) motor driver.
///
/// Produced by the saturating actuator; at most one of the two channels is
/// non-zero, and both duties lie in `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DutyCommand {
    /// Forward channel duty [%].
    pub forward: f64,
    /// Reverse channel duty [%].
    pub reverse: f64,
    /// Enable line state after the command.
    pub enabled: bool,
}

impl DutyCommand {
    /// Both channels zero, driver disabled.
    pub const SAFE: Self = Self {
        forward: 0.0,
        reverse: 0.0,
        enabled: false,
    };

    /// Signed effort represented by this command [%].
    #[inline]
    pub fn signed_percent(&self) -> f64 {
        self.forward - self.reverse
    }

    /// Returns true if neither channel is driven.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.reverse == 0.0
    }
}
