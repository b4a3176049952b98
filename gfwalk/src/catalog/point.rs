//! Point of interest record types.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::Coordinate;

/// Stable identity of a point of interest.
///
/// Datasets may use either string or integer identities; integers are
/// normalized to their decimal string form on load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PointId(String);

impl PointId {
    /// Create a point identity from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PointId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => PointId(s),
            RawId::Number(n) => PointId(n.to_string()),
        })
    }
}

impl Borrow<str> for PointId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PointId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PointId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point of interest as it appears in the catalog dataset.
///
/// Only `id`, `position` and `name` are required; the media references and
/// description are optional and tolerated when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    /// Unique identity within the catalog.
    pub id: PointId,
    /// Location of the point.
    pub position: Coordinate,
    /// Human-readable name.
    pub name: String,
    /// Optional description shown once the point is revealed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional primary image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Optional panoramic image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panorama_image: Option<String>,
}

impl PointOfInterest {
    /// Create a point with only the required fields set.
    pub fn new(id: impl Into<PointId>, position: Coordinate, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            name: name.into(),
            description: None,
            image: None,
            panorama_image: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the primary image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the panoramic image reference.
    pub fn with_panorama_image(mut self, panorama: impl Into<String>) -> Self {
        self.panorama_image = Some(panorama.into());
        self
    }
}
