//! Discovery state and tier classification
//!
//! - [`DiscoverySet`]: which points the subject has discovered this session.
//! - [`classify`]: per-point tiering from subject, catalog, set and thresholds.

mod classify;
mod store;

pub use classify::{classify, ClassifiedPoint, Thresholds, Tier, OBSCURED_PLACEHOLDER};
pub use store::{DiscoverOutcome, DiscoverySet};
