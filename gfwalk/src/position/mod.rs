//! Position sources
//!
//! A position source owns the subject coordinate. Two interchangeable
//! strategies exist:
//!
//! - [`LivePositionSource`]: a single-shot, cancellable request to a host
//!   [`LocationProvider`] with a hard timeout.
//! - [`SimulatedPositionSource`]: a deterministic coordinate moved by
//!   [`Direction`] steps, optionally repeated by a [`ContinuousStepper`].
//!
//! # Event Flow
//!
//! Background work never mutates a source directly. Tasks post outcomes to the
//! owner's event queue, tagged with a ticket; the owner hands them back to the
//! source, which discards any outcome whose ticket is no longer current.
//!
//! ```text
//! request() ──► spawn ──► provider / timeout / cancel
//!                               │
//!                               ▼
//!                 AcquisitionOutcome { ticket, result }
//!                               │  (event queue)
//!                               ▼
//!                   apply() ── stale ticket? ──► ignored
//! ```

mod error;
mod live;
mod simulated;
mod stepper;

pub use error::AcquisitionError;
pub use live::{
    AcquisitionOptions, AcquisitionOutcome, FixedLocationProvider, LivePositionSource,
    LocationProvider, UnsupportedLocationProvider, DEFAULT_ACQUISITION_TIMEOUT,
};
pub use simulated::{Direction, ParseDirectionError, SimulatedPositionSource};
pub use stepper::{
    ContinuousStepper, StepTick, SteppingConfig, DEFAULT_INITIAL_DELAY, DEFAULT_REPEAT_INTERVAL,
};

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::geo::Coordinate;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Acquisition status of a position source.
///
/// `Pending` is distinct from both `Unavailable` and from `Ready` with no
/// position, so consumers can show a loading state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionStatus {
    /// A request is in flight.
    Pending,
    /// Settled; the position may still be absent (nothing requested yet).
    Ready,
    /// The last request failed.
    Unavailable(AcquisitionError),
}

impl PositionStatus {
    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, PositionStatus::Pending)
    }

    /// The failure reason, if unavailable.
    pub fn reason(&self) -> Option<&AcquisitionError> {
        match self {
            PositionStatus::Unavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionStatus::Pending => f.write_str("pending"),
            PositionStatus::Ready => f.write_str("ready"),
            PositionStatus::Unavailable(_) => f.write_str("unavailable"),
        }
    }
}

/// Capability shared by all position sources.
pub trait PositionSource {
    /// The current subject coordinate, if known.
    fn current_position(&self) -> Option<Coordinate>;

    /// The acquisition status.
    fn status(&self) -> PositionStatus;
}
