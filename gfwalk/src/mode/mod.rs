//! Mode and view state machines
//!
//! Two orthogonal state machines decide where the subject position comes
//! from and whether it is tracked at all:
//!
//! ```text
//! Mode:  Legacy (live provider, legacy thresholds)  ◄──►  Remote (simulated, remote thresholds)
//! View:  Home (tracking suspended)                  ◄──►  Map (tracking active)
//! ```
//!
//! Neither transition touches the discovery set.

mod controller;

pub use controller::{ModeController, SourceEvent};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::discovery::Thresholds;
use crate::geo::Coordinate;

/// Default legacy thresholds: discover within 600 m, see within 3 km.
pub const DEFAULT_LEGACY_THRESHOLDS: Thresholds = Thresholds::new(0.6, 3.0);

/// Default remote thresholds: discover within 100 m, see within 500 m.
pub const DEFAULT_REMOTE_THRESHOLDS: Thresholds = Thresholds::new(0.1, 0.5);

/// Default seed for the simulated subject (central Gifu).
pub const DEFAULT_REMOTE_START: Coordinate = Coordinate::new(35.41, 136.76);

/// Default simulated step size in degrees.
pub const DEFAULT_STEP_SIZE_DEG: f64 = 0.0005;

/// Position-source mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Live geolocation.
    #[default]
    Legacy,
    /// Simulated step movement.
    Remote,
}

/// Whether the discovery view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Landing page; no position tracking.
    #[default]
    Home,
    /// Discovery map; position tracked per the current mode.
    Map,
}

/// Error returned when parsing an unknown mode or view name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} '{value}'")]
pub struct ParseStateError {
    kind: &'static str,
    value: String,
}

impl FromStr for Mode {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" | "live" => Ok(Mode::Legacy),
            "remote" | "simulated" => Ok(Mode::Remote),
            _ => Err(ParseStateError {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for View {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(View::Home),
            "map" => Ok(View::Map),
            _ => Err(ParseStateError {
                kind: "view",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Legacy => "legacy",
            Mode::Remote => "remote",
        })
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            View::Home => "home",
            View::Map => "map",
        })
    }
}

/// What happens to the simulated coordinate when Remote is entered again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteEntry {
    /// Return to the fixed start on every entry.
    #[default]
    Reseed,
    /// Continue from the last simulated coordinate.
    Resume,
}

impl FromStr for RemoteEntry {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reseed" => Ok(RemoteEntry::Reseed),
            "resume" => Ok(RemoteEntry::Resume),
            _ => Err(ParseStateError {
                kind: "remote entry policy",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RemoteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemoteEntry::Reseed => "reseed",
            RemoteEntry::Resume => "resume",
        })
    }
}

/// Settings for the live (Legacy) mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeProfile {
    /// Thresholds applied while this mode is active.
    pub thresholds: Thresholds,
}

impl Default for ModeProfile {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_LEGACY_THRESHOLDS,
        }
    }
}

/// Settings for the simulated (Remote) mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteProfile {
    /// Thresholds applied while this mode is active.
    pub thresholds: Thresholds,
    /// Seed coordinate.
    pub start: Coordinate,
    /// Degrees moved per step.
    pub step_size_deg: f64,
    /// Reseed or resume on re-entry.
    pub entry: RemoteEntry,
}

impl Default for RemoteProfile {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_REMOTE_THRESHOLDS,
            start: DEFAULT_REMOTE_START,
            step_size_deg: DEFAULT_STEP_SIZE_DEG,
            entry: RemoteEntry::default(),
        }
    }
}
