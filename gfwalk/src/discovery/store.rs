//! Discovery state store.
//!
//! The set of point identities the subject has discovered during the current
//! session. Monotonic: the engine only ever inserts. Nothing is persisted.

use std::collections::HashSet;

use crate::catalog::{PointCatalog, PointId};

use super::classify::{ClassifiedPoint, Tier};

/// Result of a discovery attempt.
///
/// Discovery never fails; misuse is reported here and otherwise ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverOutcome {
    /// The point was Interactive and is now Revealed.
    Discovered,
    /// The point was already discovered; nothing changed.
    AlreadyDiscovered,
    /// The point is in the catalog but not currently Interactive (including
    /// Hidden points and the case where no subject position is known).
    NotInteractive,
    /// No catalog point has this identity.
    UnknownPoint,
}

impl DiscoverOutcome {
    /// Whether this attempt added a new identity to the set.
    pub fn changed(&self) -> bool {
        matches!(self, DiscoverOutcome::Discovered)
    }
}

/// Set of discovered point identities.
#[derive(Debug, Clone, Default)]
pub struct DiscoverySet {
    ids: HashSet<PointId>,
}

impl DiscoverySet {
    /// Create an empty set (session start).
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` has been discovered.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of discovered points.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing has been discovered yet.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over discovered identities (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &PointId> {
        self.ids.iter()
    }

    /// Discover `id` if it is Interactive in `classified`.
    ///
    /// `classified` must be the classification of `catalog` under the current
    /// inputs. The operation is idempotent and total: anything other than an
    /// Interactive point leaves the set untouched.
    pub fn discover(
        &mut self,
        id: &str,
        catalog: &PointCatalog,
        classified: &[ClassifiedPoint],
    ) -> DiscoverOutcome {
        if !catalog.contains(id) {
            return DiscoverOutcome::UnknownPoint;
        }
        if self.contains(id) {
            return DiscoverOutcome::AlreadyDiscovered;
        }

        match classified.iter().find(|c| c.point.id.as_str() == id) {
            Some(c) if c.tier == Tier::Interactive => {
                self.ids.insert(c.point.id.clone());
                DiscoverOutcome::Discovered
            }
            // Obscured, or Hidden and therefore absent from `classified`
            _ => DiscoverOutcome::NotInteractive,
        }
    }
}

impl FromIterator<PointId> for DiscoverySet {
    fn from_iter<I: IntoIterator<Item = PointId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
