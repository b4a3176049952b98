//! The mode controller.
//!
//! Owns both position sources and the press-and-hold stepper, and decides
//! which source is active, which thresholds apply, and what transient state
//! is torn down on each transition.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::discovery::Thresholds;
use crate::geo::Coordinate;
use crate::position::{
    AcquisitionOutcome, ContinuousStepper, Direction, LivePositionSource, LocationProvider,
    PositionSource, PositionStatus, SimulatedPositionSource, StepTick,
};

use super::{Mode, RemoteEntry, View};

/// Event posted by a background position task.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// A live acquisition finished.
    Acquired(AcquisitionOutcome),
    /// A held direction repeated.
    Step(StepTick),
}

impl From<AcquisitionOutcome> for SourceEvent {
    fn from(outcome: AcquisitionOutcome) -> Self {
        SourceEvent::Acquired(outcome)
    }
}

impl From<StepTick> for SourceEvent {
    fn from(tick: StepTick) -> Self {
        SourceEvent::Step(tick)
    }
}

/// Selects the active position source and thresholds.
///
/// Initial state: `Legacy` mode, `Home` view, nothing requested.
#[derive(Debug)]
pub struct ModeController {
    config: EngineConfig,
    mode: Mode,
    view: View,
    live: LivePositionSource,
    simulated: Option<SimulatedPositionSource>,
    stepper: ContinuousStepper,
    events: mpsc::UnboundedSender<SourceEvent>,
}

impl ModeController {
    /// Create a controller that posts background results to `events`.
    pub fn new(
        config: EngineConfig,
        provider: Arc<dyn LocationProvider>,
        events: mpsc::UnboundedSender<SourceEvent>,
    ) -> Self {
        let live = LivePositionSource::new(provider, config.acquisition.clone());
        let stepper = ContinuousStepper::new(config.stepping);
        Self {
            config,
            mode: Mode::default(),
            view: View::default(),
            live,
            simulated: None,
            stepper,
            events,
        }
    }

    /// The active mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The active view.
    pub fn view(&self) -> View {
        self.view
    }

    /// The configuration in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Thresholds of the current mode.
    pub fn thresholds(&self) -> Thresholds {
        match self.mode {
            Mode::Legacy => self.config.legacy.thresholds,
            Mode::Remote => self.config.remote.thresholds,
        }
    }

    /// The subject coordinate, or `None` when unknown or not tracked.
    pub fn subject(&self) -> Option<Coordinate> {
        if self.view == View::Home {
            return None;
        }
        match self.mode {
            Mode::Legacy => self.live.current_position(),
            Mode::Remote => self.simulated.as_ref().and_then(|s| s.current_position()),
        }
    }

    /// Status of the active source. `Ready` (with no position) in Home.
    pub fn status(&self) -> PositionStatus {
        if self.view == View::Home {
            return PositionStatus::Ready;
        }
        match self.mode {
            Mode::Legacy => self.live.status(),
            Mode::Remote => PositionStatus::Ready,
        }
    }

    /// The live source.
    pub fn live(&self) -> &LivePositionSource {
        &self.live
    }

    /// The simulated source, once Remote has been activated.
    pub fn simulated(&self) -> Option<&SimulatedPositionSource> {
        self.simulated.as_ref()
    }

    /// The press-and-hold stepper.
    pub fn stepper(&self) -> &ContinuousStepper {
        &self.stepper
    }

    /// Switch mode.
    ///
    /// Setting Legacy while already in Legacy re-issues the live request
    /// (the explicit retry path). Setting Remote while in Remote does nothing.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            if mode == Mode::Legacy {
                self.retry_acquisition();
            }
            return;
        }

        match self.mode {
            Mode::Legacy => self.live.cancel(),
            Mode::Remote => {
                self.stepper.stop();
            }
        }

        info!(from = %self.mode, to = %mode, "Mode changed");
        self.mode = mode;

        if self.view == View::Map {
            self.activate();
        }
    }

    /// Switch view. Entering Map starts tracking; entering Home suspends it.
    pub fn set_view(&mut self, view: View) {
        if view == self.view {
            return;
        }

        info!(from = %self.view, to = %view, "View changed");
        self.view = view;

        match view {
            View::Map => self.activate(),
            View::Home => self.suspend(),
        }
    }

    /// Re-issue the live request. Only meaningful in Legacy mode on the Map.
    pub fn retry_acquisition(&mut self) -> bool {
        if self.mode != Mode::Legacy || self.view != View::Map {
            debug!(mode = %self.mode, view = %self.view, "Retry ignored");
            return false;
        }
        self.live.request(&self.events);
        true
    }

    /// Move the simulated subject one step.
    ///
    /// Only valid in Remote mode on the Map; returns the new position, or
    /// `None` if the step was ignored.
    pub fn step(&mut self, direction: Direction) -> Option<Coordinate> {
        if self.mode != Mode::Remote || self.view != View::Map {
            debug!(%direction, mode = %self.mode, view = %self.view, "Step ignored");
            return None;
        }
        self.simulated.as_mut().map(|sim| sim.step(direction))
    }

    /// Begin press-and-hold movement: one immediate step, then repeats.
    pub fn start_continuous_step(&mut self, direction: Direction) -> bool {
        if self.step(direction).is_none() {
            return false;
        }
        self.stepper.start(direction, &self.events)
    }

    /// End press-and-hold movement (release, leave or blur).
    pub fn stop_continuous_step(&mut self) -> bool {
        self.stepper.stop()
    }

    /// Apply a background event. Returns whether the subject changed state.
    pub fn handle(&mut self, event: SourceEvent) -> bool {
        match event {
            SourceEvent::Acquired(outcome) => {
                if self.mode != Mode::Legacy || self.view != View::Map {
                    debug!(ticket = outcome.ticket, "Acquisition outcome outside live tracking");
                    return false;
                }
                self.live.apply(outcome)
            }
            SourceEvent::Step(tick) => {
                if !self.stepper.accepts(&tick) {
                    debug!(ticket = tick.ticket, "Ignoring stale step tick");
                    return false;
                }
                self.step(tick.direction).is_some()
            }
        }
    }

    fn activate(&mut self) {
        match self.mode {
            Mode::Legacy => self.live.request(&self.events),
            Mode::Remote => self.activate_simulated(),
        }
    }

    fn activate_simulated(&mut self) {
        let remote = self.config.remote;
        match self.simulated.as_mut() {
            None => {
                self.simulated = Some(SimulatedPositionSource::new(
                    remote.start,
                    remote.step_size_deg,
                ));
            }
            Some(sim) => {
                if remote.entry == RemoteEntry::Reseed {
                    sim.reseed();
                }
            }
        }
        debug!(entry = %remote.entry, "Simulated source active");
    }

    fn suspend(&mut self) {
        self.live.cancel();
        self.stepper.stop();
    }
}
