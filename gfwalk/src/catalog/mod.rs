//! Point catalog
//!
//! The catalog is the immutable, ordered list of points of interest the
//! engine classifies. It is supplied externally (a JSON dataset) and only
//! read by the engine; there are no insert or delete operations.
//!
//! # Record Format
//!
//! ```text
//! [
//!   { "id": "gifu_castle", "position": [35.423, 136.762], "name": "...",
//!     "description": "...", "image": "...", "panoramaImage": "..." },
//!   ...
//! ]
//! ```

mod error;
mod point;

pub use error::CatalogError;
pub use point::{PointId, PointOfInterest};

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

/// Dataset bundled with the crate: sightseeing spots around Gifu city.
const BUILTIN_MARKERS: &str = include_str!("../../data/markers.json");

/// Immutable ordered list of points of interest.
///
/// Cloning is cheap; points are shared behind `Arc`.
#[derive(Debug, Clone)]
pub struct PointCatalog {
    points: Arc<[Arc<PointOfInterest>]>,
}

impl Default for PointCatalog {
    fn default() -> Self {
        Self {
            points: Arc::from(Vec::new()),
        }
    }
}

impl PointCatalog {
    /// Build a catalog from points, enforcing unique non-empty identities.
    pub fn new(points: Vec<PointOfInterest>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(points.len());
        for (index, point) in points.iter().enumerate() {
            if point.id.as_str().is_empty() {
                return Err(CatalogError::EmptyId(index));
            }
            if !seen.insert(point.id.as_str()) {
                return Err(CatalogError::DuplicateId(point.id.to_string()));
            }
        }

        Ok(Self {
            points: points.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a catalog from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let points: Vec<PointOfInterest> = serde_json::from_str(json)?;
        Self::new(points)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        info!(path = %path.display(), points = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// The bundled Gifu dataset.
    pub fn builtin() -> Self {
        // The bundled dataset is covered by tests; fall back to empty rather
        // than panic if it were ever malformed.
        Self::from_json_str(BUILTIN_MARKERS).unwrap_or_default()
    }

    /// Number of points in the catalog.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the catalog has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over points in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PointOfInterest>> {
        self.points.iter()
    }

    /// Look up a point by identity.
    pub fn get(&self, id: &str) -> Option<&Arc<PointOfInterest>> {
        self.points.iter().find(|p| p.id.as_str() == id)
    }

    /// Whether the catalog contains a point with this identity.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}
