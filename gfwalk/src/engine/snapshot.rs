//! Render snapshot handed to consumers after each change.

use std::sync::Arc;

use crate::discovery::{ClassifiedPoint, Tier};
use crate::geo::Coordinate;
use crate::mode::{Mode, View};
use crate::position::{AcquisitionError, PositionStatus};

/// Everything a consumer needs to render one classification cycle.
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    /// Active mode.
    pub mode: Mode,
    /// Active view.
    pub view: View,
    /// Status of the active position source.
    pub status: PositionStatus,
    /// Subject coordinate, if known.
    pub subject: Option<Coordinate>,
    /// Rendered points in catalog order (Hidden excluded).
    pub points: Arc<[ClassifiedPoint]>,
    /// Size of the discovery set.
    pub discovered_count: usize,
    /// Size of the catalog.
    pub catalog_size: usize,
}

impl RenderSnapshot {
    /// Whether the consumer should show a loading state instead of points.
    pub fn is_loading(&self) -> bool {
        self.status.is_pending()
    }

    /// The failure reason, when the live source is unavailable.
    pub fn unavailable_reason(&self) -> Option<&AcquisitionError> {
        self.status.reason()
    }

    /// Points of a given tier.
    pub fn points_in(&self, tier: Tier) -> impl Iterator<Item = &ClassifiedPoint> {
        self.points.iter().filter(move |c| c.tier == tier)
    }

    /// Closest rendered point not yet discovered.
    pub fn nearest_undiscovered(&self) -> Option<&ClassifiedPoint> {
        self.points
            .iter()
            .filter(|c| c.tier != Tier::Revealed)
            .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
    }

    /// Whether every catalog point has been discovered.
    pub fn is_complete(&self) -> bool {
        self.catalog_size > 0 && self.discovered_count == self.catalog_size
    }
}
