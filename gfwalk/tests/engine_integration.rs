//! Integration tests for the discovery engine.
//!
//! These tests drive the public engine API end to end:
//! - Live acquisition with delayed, failing and superseded providers
//! - Walking the simulated subject and discovering points
//! - Press-and-hold stepping under a paused clock
//! - Discovery persistence across mode and view changes
//!
//! Run with: `cargo test --test engine_integration`

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use gfwalk::catalog::PointCatalog;
use gfwalk::config::EngineConfig;
use gfwalk::discovery::{DiscoverOutcome, Thresholds, Tier};
use gfwalk::engine::{DiscoveryEngine, RenderSnapshot};
use gfwalk::geo::Coordinate;
use gfwalk::mode::{Mode, View};
use gfwalk::position::{
    AcquisitionError, AcquisitionOptions, BoxFuture, Direction, FixedLocationProvider,
    LocationProvider, PositionStatus,
};

// ============================================================================
// Test Providers
// ============================================================================

/// Provider whose answer can be moved between requests.
struct MovableProvider {
    position: Mutex<Coordinate>,
}

impl MovableProvider {
    fn new(position: Coordinate) -> Arc<Self> {
        Arc::new(Self {
            position: Mutex::new(position),
        })
    }

    fn move_to(&self, position: Coordinate) {
        *self.position.lock().unwrap() = position;
    }
}

impl LocationProvider for MovableProvider {
    fn current_position<'a>(
        &'a self,
        _options: &'a AcquisitionOptions,
    ) -> BoxFuture<'a, Result<Coordinate, AcquisitionError>> {
        let position = *self.position.lock().unwrap();
        Box::pin(async move { Ok(position) })
    }
}

/// Provider that replays a fixed script of answers, one per request.
struct ScriptedProvider {
    script: Mutex<VecDeque<Result<Coordinate, AcquisitionError>>>,
}

impl ScriptedProvider {
    fn new(script: Vec<Result<Coordinate, AcquisitionError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
        })
    }
}

impl LocationProvider for ScriptedProvider {
    fn current_position<'a>(
        &'a self,
        _options: &'a AcquisitionOptions,
    ) -> BoxFuture<'a, Result<Coordinate, AcquisitionError>> {
        let next = self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(AcquisitionError::PositionUnavailable(
                "script exhausted".to_string(),
            ))
        });
        Box::pin(async move { next })
    }
}

/// Provider that never answers.
struct SilentProvider;

impl LocationProvider for SilentProvider {
    fn current_position<'a>(
        &'a self,
        _options: &'a AcquisitionOptions,
    ) -> BoxFuture<'a, Result<Coordinate, AcquisitionError>> {
        Box::pin(std::future::pending())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

const REMOTE_START: Coordinate = Coordinate::new(35.41, 136.76);
const GIFU_STATION: Coordinate = Coordinate::new(35.404, 136.757);

fn engine_with(provider: Arc<dyn LocationProvider>) -> DiscoveryEngine {
    DiscoveryEngine::builder().provider(provider).build()
}

fn remote_engine() -> DiscoveryEngine {
    let mut engine = DiscoveryEngine::builder().build();
    engine.set_view(View::Map);
    engine.set_mode(Mode::Remote);
    engine
}

fn tier_of(snapshot: &RenderSnapshot, id: &str) -> Option<Tier> {
    snapshot
        .points
        .iter()
        .find(|c| c.point.id.as_str() == id)
        .map(|c| c.tier)
}

fn walk(engine: &mut DiscoveryEngine, direction: Direction, steps: usize) {
    for _ in 0..steps {
        assert!(engine.step(direction).is_some());
    }
}

async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(1)).await;
}

// ============================================================================
// Live Acquisition
// ============================================================================

/// A station 0.67 km away is Obscured; after moving to 0.22 km it becomes
/// Interactive and can be discovered.
#[tokio::test]
async fn test_legacy_station_obscured_then_interactive() {
    let provider = MovableProvider::new(Coordinate::new(35.41, 136.757));
    let mut engine = engine_with(provider.clone());
    engine.set_view(View::Map);
    assert!(engine.next_event().await);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.mode, Mode::Legacy);
    assert_eq!(tier_of(&snapshot, "jr_gifu_station"), Some(Tier::Obscured));
    assert_eq!(
        engine.discover("jr_gifu_station"),
        DiscoverOutcome::NotInteractive
    );

    provider.move_to(Coordinate::new(35.406, 136.757));
    assert!(engine.retry_acquisition());
    assert!(engine.snapshot().is_loading());
    assert!(engine.next_event().await);

    let snapshot = engine.snapshot();
    assert_eq!(
        tier_of(&snapshot, "jr_gifu_station"),
        Some(Tier::Interactive)
    );
    assert_eq!(
        engine.discover("jr_gifu_station"),
        DiscoverOutcome::Discovered
    );
    assert_eq!(
        tier_of(&engine.snapshot(), "jr_gifu_station"),
        Some(Tier::Revealed)
    );
}

/// Leaving the Map while a request is pending must drop its result, even if
/// the provider would have answered later.
#[tokio::test(start_paused = true)]
async fn test_leaving_map_discards_pending_acquisition() {
    let provider = FixedLocationProvider::new(GIFU_STATION).with_delay(Duration::from_secs(1));
    let mut engine = engine_with(Arc::new(provider));

    engine.set_view(View::Map);
    assert_eq!(engine.status(), PositionStatus::Pending);

    engine.set_view(View::Home);
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(engine.drain_pending(), 0);
    assert!(engine.subject().is_none());
    assert!(engine.snapshot().points.is_empty());
    assert!(!engine.controller().live().has_in_flight());

    // Coming back issues a fresh request that does complete
    engine.set_view(View::Map);
    assert!(engine.next_event().await);
    assert_eq!(engine.subject(), Some(GIFU_STATION));
}

/// Switching to Remote mid-acquisition must not let the late fix override
/// the simulated subject.
#[tokio::test(start_paused = true)]
async fn test_mode_switch_discards_pending_acquisition() {
    let provider = FixedLocationProvider::new(GIFU_STATION).with_delay(Duration::from_millis(500));
    let mut engine = engine_with(Arc::new(provider));

    engine.set_view(View::Map);
    engine.set_mode(Mode::Remote);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(engine.drain_pending(), 0);
    assert_eq!(engine.subject(), Some(REMOTE_START));
}

/// A retry supersedes the first request; only one outcome is applied.
#[tokio::test(start_paused = true)]
async fn test_retry_supersedes_in_flight_request() {
    let provider = FixedLocationProvider::new(GIFU_STATION).with_delay(Duration::from_millis(300));
    let mut engine = engine_with(Arc::new(provider));

    engine.set_view(View::Map);
    let first_ticket = engine.controller().live().ticket();
    tokio::time::sleep(Duration::from_millis(100)).await;
    engine.retry_acquisition();
    assert!(engine.controller().live().ticket() > first_ticket);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(engine.drain_pending(), 1);
    assert_eq!(engine.status(), PositionStatus::Ready);
    assert_eq!(engine.subject(), Some(GIFU_STATION));
}

/// A denied request leaves the map without points until an explicit retry.
#[tokio::test]
async fn test_denied_then_retry_succeeds() {
    let provider = ScriptedProvider::new(vec![
        Err(AcquisitionError::Denied("user declined".to_string())),
        Ok(GIFU_STATION),
    ]);
    let mut engine = engine_with(provider);

    engine.set_view(View::Map);
    assert!(engine.next_event().await);

    let snapshot = engine.snapshot();
    assert!(snapshot.points.is_empty());
    let reason = snapshot.unavailable_reason().cloned();
    assert!(matches!(reason, Some(AcquisitionError::Denied(_))));
    assert!(reason.is_some_and(|r| r.suggests_remote_mode()));

    // No automatic retry
    assert_eq!(engine.drain_pending(), 0);

    // Selecting Legacy again is the retry path
    engine.set_mode(Mode::Legacy);
    assert!(engine.next_event().await);
    assert_eq!(engine.subject(), Some(GIFU_STATION));
    assert!(!engine.snapshot().points.is_empty());
}

/// A provider that never answers is cut off by the hard timeout.
#[tokio::test(start_paused = true)]
async fn test_silent_provider_times_out() {
    let mut config = EngineConfig::default();
    config.acquisition.timeout = Duration::from_millis(5000);
    let mut engine = DiscoveryEngine::builder()
        .config(config)
        .provider(Arc::new(SilentProvider))
        .build();

    let started = Instant::now();
    engine.set_view(View::Map);
    assert!(engine.next_event().await);

    assert!(started.elapsed() >= Duration::from_millis(5000));
    assert_eq!(
        engine.status(),
        PositionStatus::Unavailable(AcquisitionError::Timeout(Duration::from_millis(5000)))
    );
    assert!(engine.snapshot().points.is_empty());
}

// ============================================================================
// Simulated Walking
// ============================================================================

/// Four steps east from the seed land on longitude 136.762.
#[tokio::test]
async fn test_remote_four_steps_right() {
    let mut engine = remote_engine();
    walk(&mut engine, Direction::Right, 4);

    let subject = engine.subject().unwrap();
    assert!((subject.lat - 35.41).abs() < 1e-12);
    assert!((subject.lon - 136.762).abs() < 1e-9);
}

/// Steps outside Remote mode or off the Map do nothing.
#[tokio::test]
async fn test_step_ignored_outside_remote_map() {
    let mut engine = DiscoveryEngine::builder().build();
    assert!(engine.step(Direction::Up).is_none());

    engine.set_mode(Mode::Remote);
    assert!(engine.step(Direction::Up).is_none());

    engine.set_view(View::Map);
    assert!(engine.step(Direction::Up).is_some());
}

/// A discovered point stays revealed beyond the visible radius and across
/// every mode and view change.
#[tokio::test]
async fn test_discovery_persists_across_modes_and_distance() {
    let mut engine = remote_engine();
    walk(&mut engine, Direction::Right, 10);
    assert_eq!(engine.discover("kinkazan"), DiscoverOutcome::Discovered);

    // 1.36 km west of Mt. Kinka, well past the 0.5 km visible radius
    walk(&mut engine, Direction::Left, 30);
    assert_eq!(tier_of(&engine.snapshot(), "kinkazan"), Some(Tier::Revealed));

    engine.set_mode(Mode::Legacy);
    engine.set_view(View::Home);
    engine.set_view(View::Map);
    engine.set_mode(Mode::Remote);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.discovered_count, 1);
    assert_eq!(tier_of(&snapshot, "kinkazan"), Some(Tier::Revealed));
    assert_eq!(engine.discover("kinkazan"), DiscoverOutcome::AlreadyDiscovered);
}

/// Unknown ids are a no-op.
#[tokio::test]
async fn test_discover_unknown_point() {
    let mut engine = remote_engine();
    assert_eq!(engine.discover("atlantis"), DiscoverOutcome::UnknownPoint);
    assert!(engine.discovered().is_empty());
}

/// Obscured points hide their name and description.
#[tokio::test]
async fn test_obscured_point_masks_identity() {
    let mut engine = remote_engine();
    let snapshot = engine.snapshot();
    let kinkazan = snapshot
        .points
        .iter()
        .find(|c| c.point.id.as_str() == "kinkazan")
        .unwrap();

    assert_eq!(kinkazan.tier, Tier::Obscured);
    assert_eq!(kinkazan.display_name(), "???");
    assert_eq!(kinkazan.display_description(), Some("???"));
}

/// Custom catalogs and thresholds flow through the builder.
#[tokio::test]
async fn test_custom_catalog_and_thresholds() {
    let catalog = PointCatalog::from_json_str(
        r#"[
            {"id": 1, "position": [35.41, 136.7605], "name": "Near"},
            {"id": 2, "position": [35.41, 136.80], "name": "Far"}
        ]"#,
    )
    .unwrap();
    let config = EngineConfig::default().with_thresholds(Mode::Remote, Thresholds::new(0.1, 10.0));

    let mut engine = DiscoveryEngine::builder()
        .catalog(catalog)
        .config(config)
        .build();
    engine.set_view(View::Map);
    engine.set_mode(Mode::Remote);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.catalog_size, 2);
    assert_eq!(tier_of(&snapshot, "1"), Some(Tier::Interactive));
    assert_eq!(tier_of(&snapshot, "2"), Some(Tier::Obscured));
    assert_eq!(engine.discover("1"), DiscoverOutcome::Discovered);
}

// ============================================================================
// Press-and-Hold
// ============================================================================

/// One immediate step, first repeat after 100 ms, then every 200 ms.
#[tokio::test(start_paused = true)]
async fn test_hold_right_repeats_on_schedule() {
    let mut engine = remote_engine();

    assert!(engine.start_continuous_step(Direction::Right));
    assert!((engine.subject().unwrap().lon - 136.7605).abs() < 1e-9);

    // Repeats at 100, 300 and 500 ms
    tokio::time::sleep(Duration::from_millis(550)).await;
    assert_eq!(engine.drain_pending(), 3);
    assert!((engine.subject().unwrap().lon - 136.762).abs() < 1e-9);

    assert!(engine.stop_continuous_step());
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(engine.drain_pending(), 0);
    assert!((engine.subject().unwrap().lon - 136.762).abs() < 1e-9);
}

/// A repeat queued just before release is not applied.
#[tokio::test(start_paused = true)]
async fn test_tick_queued_before_release_is_dropped() {
    let mut engine = remote_engine();
    engine.start_continuous_step(Direction::Up);

    tokio::time::sleep(Duration::from_millis(150)).await;
    engine.stop_continuous_step();

    assert_eq!(engine.drain_pending(), 0);
    assert!((engine.subject().unwrap().lat - 35.4105).abs() < 1e-9);
}

/// Rapid press/release cycles leave no repeat task running.
#[tokio::test(start_paused = true)]
async fn test_rapid_press_release_does_not_leak() {
    let mut engine = remote_engine();

    for i in 0..50 {
        let direction = Direction::ALL[i % Direction::ALL.len()];
        engine.start_continuous_step(direction);
        if i % 3 == 0 {
            tokio::time::sleep(Duration::from_millis(120)).await;
            engine.drain_pending();
        }
        engine.stop_continuous_step();
    }
    settle().await;

    assert!(!engine.controller().stepper().is_active());
    assert_eq!(engine.controller().stepper().running_tasks(), 0);

    let before = engine.subject();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(engine.drain_pending(), 0);
    assert_eq!(engine.subject(), before);
}

/// Mode and view changes end press-and-hold.
#[tokio::test(start_paused = true)]
async fn test_transitions_stop_holding() {
    let mut engine = remote_engine();

    engine.start_continuous_step(Direction::Left);
    engine.set_view(View::Home);
    assert!(!engine.controller().stepper().is_active());

    engine.set_view(View::Map);
    engine.start_continuous_step(Direction::Left);
    engine.set_mode(Mode::Legacy);
    assert!(!engine.controller().stepper().is_active());

    settle().await;
    assert_eq!(engine.controller().stepper().running_tasks(), 0);
}

// ============================================================================
// Snapshot
// ============================================================================

#[tokio::test]
async fn test_snapshot_counts_and_nearest() {
    let mut engine = remote_engine();
    let snapshot = engine.snapshot();

    assert_eq!(snapshot.catalog_size, 8);
    assert_eq!(snapshot.discovered_count, 0);
    assert_eq!(snapshot.subject, Some(REMOTE_START));
    assert_eq!(
        snapshot.nearest_undiscovered().map(|c| c.point.id.as_str()),
        Some("kinkazan")
    );

    walk(&mut engine, Direction::Right, 10);
    engine.discover("kinkazan");

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.discovered_count, 1);
    assert_eq!(snapshot.points_in(Tier::Revealed).count(), 1);
    assert!(snapshot.nearest_undiscovered().is_none());
}
