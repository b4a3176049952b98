//! Acquisition error types.

use std::time::Duration;

use thiserror::Error;

/// Reasons a live position acquisition can fail.
///
/// None of these are fatal. They surface as
/// [`PositionStatus::Unavailable`](super::PositionStatus::Unavailable) and
/// their `Display` text is the human-readable reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    /// The provider did not answer before the configured timeout.
    #[error("Position request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The user or host denied access to the location facility.
    #[error("Location access denied: {0}")]
    Denied(String),

    /// The provider answered but could not determine a position.
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    /// The host has no location capability at all.
    #[error("Location is not supported in this environment: {0}")]
    UnsupportedEnvironment(String),
}

impl AcquisitionError {
    /// Whether switching to the simulated mode is a sensible suggestion.
    ///
    /// Timeouts may resolve on retry; the other failures will not.
    pub fn suggests_remote_mode(&self) -> bool {
        !matches!(self, AcquisitionError::Timeout(_))
    }
}
