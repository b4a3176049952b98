//! GFwalk - Proximity discovery for points of interest
//!
//! This library classifies a fixed catalog of geotagged points by their
//! distance from a subject position and tracks which points the user has
//! discovered. The subject comes either from a live location provider
//! (Legacy mode) or from a simulated walker moved in fixed steps (Remote
//! mode).
//!
//! # Modules
//!
//! - [`geo`]: coordinates and great-circle distance
//! - [`catalog`]: the immutable point catalog
//! - [`discovery`]: tier classification and the discovery set
//! - [`position`]: live and simulated position sources, press-and-hold stepping
//! - [`mode`]: mode/view state and the controller that switches sources
//! - [`engine`]: the façade tying everything together
//! - [`config`]: INI configuration
//! - [`logging`]: tracing subscriber setup

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod geo;
pub mod logging;
pub mod mode;
pub mod position;

pub use catalog::{PointCatalog, PointId, PointOfInterest};
pub use config::EngineConfig;
pub use discovery::{ClassifiedPoint, DiscoverOutcome, DiscoverySet, Thresholds, Tier};
pub use engine::{DiscoveryEngine, RenderSnapshot};
pub use geo::{distance_km, Coordinate};
pub use mode::{Mode, View};
pub use position::{Direction, PositionStatus};
