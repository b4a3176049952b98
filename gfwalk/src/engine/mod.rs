//! Proximity discovery engine
//!
//! Wires the catalog, discovery set and mode controller together and exposes
//! the render-ready view model.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         DiscoveryEngine                          │
//! │                                                                  │
//! │  user actions ──► ModeController ──► subject + thresholds ──┐    │
//! │                        ▲                                    ▼    │
//! │  background tasks ─► event queue            PointCatalog ─► classify ─► RenderSnapshot
//! │  (acquisition,          (serialised)        DiscoverySet ─┘    ▲ │
//! │   step repeats)                                  ▲             │ │
//! │                                   discover(id) ──┴── memoized ─┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All mutation goes through `&mut self`, one call or one event at a time.
//! Background tasks only post events; [`DiscoveryEngine::next_event`] and
//! [`DiscoveryEngine::drain_pending`] apply them. Any mutation invalidates
//! the memoized classification, which is recomputed synchronously on the
//! next read.
//!
//! # Example
//!
//! ```ignore
//! use gfwalk::engine::DiscoveryEngine;
//! use gfwalk::mode::{Mode, View};
//! use gfwalk::position::Direction;
//!
//! let mut engine = DiscoveryEngine::builder().build();
//! engine.set_view(View::Map);
//! engine.set_mode(Mode::Remote);
//! engine.step(Direction::Right);
//!
//! let snapshot = engine.snapshot();
//! for point in snapshot.points.iter() {
//!     println!("{} {:.2} km", point.display_name(), point.distance_km);
//! }
//! ```

mod snapshot;

pub use snapshot::RenderSnapshot;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::catalog::PointCatalog;
use crate::config::EngineConfig;
use crate::discovery::{classify, ClassifiedPoint, DiscoverOutcome, DiscoverySet, Thresholds};
use crate::geo::Coordinate;
use crate::mode::{Mode, ModeController, SourceEvent, View};
use crate::position::{
    Direction, LocationProvider, PositionStatus, UnsupportedLocationProvider,
};

/// Builder for [`DiscoveryEngine`].
pub struct DiscoveryEngineBuilder {
    catalog: PointCatalog,
    config: EngineConfig,
    provider: Arc<dyn LocationProvider>,
}

impl DiscoveryEngineBuilder {
    /// Use `catalog` instead of the bundled dataset.
    pub fn catalog(mut self, catalog: PointCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Use `config` instead of the defaults.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `provider` for live acquisition.
    pub fn provider(mut self, provider: Arc<dyn LocationProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Build the engine: Legacy mode, Home view, nothing discovered.
    pub fn build(self) -> DiscoveryEngine {
        let (tx, rx) = mpsc::unbounded_channel();
        DiscoveryEngine {
            catalog: self.catalog,
            discovered: DiscoverySet::new(),
            controller: ModeController::new(self.config, self.provider, tx),
            events: rx,
            classified: None,
        }
    }
}

/// The proximity discovery engine.
#[derive(Debug)]
pub struct DiscoveryEngine {
    catalog: PointCatalog,
    discovered: DiscoverySet,
    controller: ModeController,
    events: mpsc::UnboundedReceiver<SourceEvent>,
    classified: Option<Arc<[ClassifiedPoint]>>,
}

impl DiscoveryEngine {
    /// Start building an engine with the bundled catalog, default
    /// configuration and no location capability.
    pub fn builder() -> DiscoveryEngineBuilder {
        DiscoveryEngineBuilder {
            catalog: PointCatalog::builtin(),
            config: EngineConfig::default(),
            provider: Arc::new(UnsupportedLocationProvider),
        }
    }

    /// The point catalog.
    pub fn catalog(&self) -> &PointCatalog {
        &self.catalog
    }

    /// The discovery set.
    pub fn discovered(&self) -> &DiscoverySet {
        &self.discovered
    }

    /// The mode controller (read-only).
    pub fn controller(&self) -> &ModeController {
        &self.controller
    }

    /// Active mode.
    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    /// Active view.
    pub fn view(&self) -> View {
        self.controller.view()
    }

    /// Status of the active position source.
    pub fn status(&self) -> PositionStatus {
        self.controller.status()
    }

    /// Subject coordinate, if known and tracked.
    pub fn subject(&self) -> Option<Coordinate> {
        self.controller.subject()
    }

    /// Thresholds of the active mode.
    pub fn thresholds(&self) -> Thresholds {
        self.controller.thresholds()
    }

    /// Switch mode. The discovery set is kept.
    pub fn set_mode(&mut self, mode: Mode) {
        self.controller.set_mode(mode);
        self.invalidate();
    }

    /// Switch view. The discovery set and mode are kept.
    pub fn set_view(&mut self, view: View) {
        self.controller.set_view(view);
        self.invalidate();
    }

    /// Re-issue the live request (Legacy mode on the Map only).
    pub fn retry_acquisition(&mut self) -> bool {
        let retried = self.controller.retry_acquisition();
        if retried {
            self.invalidate();
        }
        retried
    }

    /// Move the simulated subject one step (Remote mode on the Map only).
    pub fn step(&mut self, direction: Direction) -> Option<Coordinate> {
        let moved = self.controller.step(direction);
        if moved.is_some() {
            self.invalidate();
        }
        moved
    }

    /// Begin press-and-hold movement.
    ///
    /// The immediate step can land even when repeating cannot start (no
    /// runtime), so the classification is always recomputed.
    pub fn start_continuous_step(&mut self, direction: Direction) -> bool {
        let started = self.controller.start_continuous_step(direction);
        self.invalidate();
        started
    }

    /// End press-and-hold movement.
    pub fn stop_continuous_step(&mut self) -> bool {
        self.controller.stop_continuous_step()
    }

    /// Discover `id` if it is currently Interactive.
    ///
    /// Total: never fails, and anything but an Interactive, undiscovered
    /// point is a no-op.
    pub fn discover(&mut self, id: &str) -> DiscoverOutcome {
        let classified = self.classified();
        let outcome = self.discovered.discover(id, &self.catalog, &classified);

        if outcome.changed() {
            info!(
                point = id,
                discovered = self.discovered.len(),
                total = self.catalog.len(),
                "Point discovered"
            );
            self.invalidate();
        } else {
            debug!(point = id, ?outcome, "Discovery had no effect");
        }
        outcome
    }

    /// The current classification, recomputed only if an input changed.
    pub fn classified(&mut self) -> Arc<[ClassifiedPoint]> {
        if let Some(cached) = &self.classified {
            return Arc::clone(cached);
        }

        let subject = if self.controller.status().is_pending() {
            None
        } else {
            self.controller.subject()
        };
        let fresh: Arc<[ClassifiedPoint]> = classify(
            subject,
            &self.catalog,
            &self.discovered,
            self.controller.thresholds(),
        )
        .into();
        self.classified = Some(Arc::clone(&fresh));
        fresh
    }

    /// The render view model for the current state.
    pub fn snapshot(&mut self) -> RenderSnapshot {
        let points = self.classified();
        RenderSnapshot {
            mode: self.controller.mode(),
            view: self.controller.view(),
            status: self.controller.status(),
            subject: self.controller.subject(),
            points,
            discovered_count: self.discovered.len(),
            catalog_size: self.catalog.len(),
        }
    }

    /// Apply a background event. Returns whether anything changed.
    pub fn handle_event(&mut self, event: SourceEvent) -> bool {
        let changed = self.controller.handle(event);
        if changed {
            self.invalidate();
        }
        changed
    }

    /// Wait for the next background event and apply it.
    pub async fn next_event(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => self.handle_event(event),
            None => false,
        }
    }

    /// Apply every event already queued without waiting. Returns how many
    /// changed state.
    pub fn drain_pending(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(event) = self.events.try_recv() {
            if self.handle_event(event) {
                changed += 1;
            }
        }
        changed
    }

    fn invalidate(&mut self) {
        self.classified = None;
    }
}
