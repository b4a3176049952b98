//! Tier classification.
//!
//! Combines the subject coordinate, the catalog, the discovery set and the
//! active thresholds into the render-ready list of classified points.
//!
//! # Tier Rules (in priority order)
//!
//! ```text
//! discovered              → Revealed     (always rendered)
//! d <= interactive        → Interactive  (rendered, discoverable)
//! interactive < d <= vis  → Obscured     (rendered, identity hidden)
//! d > visible             → Hidden       (not in the output)
//! ```
//!
//! Classification is a pure function of its inputs. Nothing is cached here;
//! memoization is the caller's concern.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{PointCatalog, PointOfInterest};
use crate::geo::{distance_km, Coordinate};

use super::store::DiscoverySet;

/// Label shown in place of an Obscured point's name and description.
pub const OBSCURED_PLACEHOLDER: &str = "???";

/// Distance thresholds in kilometers.
///
/// `interactive_km <= visible_km` is expected. When violated the classifier
/// treats the interactive radius as the smaller of the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Radius within which a point can be discovered.
    pub interactive_km: f64,
    /// Radius within which a point is rendered at all.
    pub visible_km: f64,
}

impl Thresholds {
    /// Create a threshold pair.
    pub const fn new(interactive_km: f64, visible_km: f64) -> Self {
        Self {
            interactive_km,
            visible_km,
        }
    }

    /// The thresholds actually applied: negatives floored to zero and the
    /// interactive radius clamped to the visible radius.
    pub fn effective(&self) -> Self {
        let visible = self.visible_km.max(0.0);
        let interactive = self.interactive_km.max(0.0).min(visible);
        Self::new(interactive, visible)
    }

    /// Tier of a point at distance `d` that has not been discovered.
    pub fn tier_for_distance(&self, d: f64) -> Tier {
        let t = self.effective();
        if d <= t.interactive_km {
            Tier::Interactive
        } else if d <= t.visible_km {
            Tier::Obscured
        } else {
            Tier::Hidden
        }
    }
}

/// Visibility and interactivity of a point relative to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Beyond the visible radius; excluded from output.
    Hidden,
    /// Within the visible radius but not yet reachable; identity hidden.
    Obscured,
    /// Within the interactive radius; may be discovered.
    Interactive,
    /// Discovered earlier in the session; shown regardless of distance.
    Revealed,
}

impl Tier {
    /// Tier from discovery membership and distance.
    pub fn of(discovered: bool, distance_km: f64, thresholds: &Thresholds) -> Self {
        if discovered {
            Tier::Revealed
        } else {
            thresholds.tier_for_distance(distance_km)
        }
    }

    /// Whether points of this tier appear in the render output.
    pub fn is_rendered(&self) -> bool {
        !matches!(self, Tier::Hidden)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Hidden => "hidden",
            Tier::Obscured => "obscured",
            Tier::Interactive => "interactive",
            Tier::Revealed => "revealed",
        };
        f.write_str(name)
    }
}

/// A catalog point with its current distance and tier.
///
/// Derived and ephemeral: recomputed whenever an input changes.
#[derive(Debug, Clone)]
pub struct ClassifiedPoint {
    /// The underlying catalog record.
    pub point: Arc<PointOfInterest>,
    /// Distance from the subject in kilometers.
    pub distance_km: f64,
    /// Current tier.
    pub tier: Tier,
}

impl ClassifiedPoint {
    /// Name to display; the placeholder while Obscured.
    pub fn display_name(&self) -> &str {
        match self.tier {
            Tier::Obscured => OBSCURED_PLACEHOLDER,
            _ => &self.point.name,
        }
    }

    /// Description to display; the placeholder while Obscured.
    pub fn display_description(&self) -> Option<&str> {
        match self.tier {
            Tier::Obscured => Some(OBSCURED_PLACEHOLDER),
            _ => self.point.description.as_deref(),
        }
    }

    /// Whether the discovery operation would accept this point.
    pub fn is_discoverable(&self) -> bool {
        self.tier == Tier::Interactive
    }
}

/// Classify every catalog point relative to `subject`.
///
/// Returns points in catalog order with Hidden points removed. An absent
/// subject yields an empty list.
pub fn classify(
    subject: Option<Coordinate>,
    catalog: &PointCatalog,
    discovered: &DiscoverySet,
    thresholds: Thresholds,
) -> Vec<ClassifiedPoint> {
    let Some(subject) = subject else {
        return Vec::new();
    };
    let thresholds = thresholds.effective();

    catalog
        .iter()
        .filter_map(|point| {
            let d = distance_km(subject, point.position);
            let tier = Tier::of(discovered.contains(point.id.as_str()), d, &thresholds);
            tier.is_rendered().then(|| ClassifiedPoint {
                point: Arc::clone(point),
                distance_km: d,
                tier,
            })
        })
        .collect()
}
