//! Press-and-hold stepping.
//!
//! While a direction is held, a background task posts [`StepTick`]s to the
//! owner's event queue: the first after `initial_delay`, then one every
//! `interval`. Releasing (or leaving the view, or losing focus) must call
//! [`ContinuousStepper::stop`]; a task that outlives its press is a leak.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::Direction;

/// Default delay before the first repeat.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(100);

/// Default delay between subsequent repeats.
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(200);

/// Timing for continuous stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SteppingConfig {
    /// Delay between the press and the first repeat.
    pub initial_delay: Duration,
    /// Delay between repeats after the first.
    pub interval: Duration,
}

impl Default for SteppingConfig {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            interval: DEFAULT_REPEAT_INTERVAL,
        }
    }
}

/// One repeat of a held direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTick {
    /// Ticket of the press that produced this tick.
    pub ticket: u64,
    /// Held direction.
    pub direction: Direction,
}

#[derive(Debug)]
struct Held {
    direction: Direction,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Drives repeated steps while a direction is held.
#[derive(Debug)]
pub struct ContinuousStepper {
    config: SteppingConfig,
    ticket: u64,
    held: Option<Held>,
    running: Arc<AtomicUsize>,
}

/// Decrements the running-task count when the task ends, however it ends.
struct RunningGuard(Arc<AtomicUsize>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ContinuousStepper {
    /// Create an idle stepper.
    pub fn new(config: SteppingConfig) -> Self {
        Self {
            config,
            ticket: 0,
            held: None,
            running: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Timing configuration.
    pub fn config(&self) -> SteppingConfig {
        self.config
    }

    /// Whether a direction is currently held.
    pub fn is_active(&self) -> bool {
        self.held.is_some()
    }

    /// The held direction, if any.
    pub fn direction(&self) -> Option<Direction> {
        self.held.as_ref().map(|h| h.direction)
    }

    /// Number of repeat tasks that have not yet exited.
    ///
    /// Stays at zero or one; anything left after [`stop`](Self::stop) has
    /// been given a chance to run is a leaked timer.
    pub fn running_tasks(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// Start repeating `direction`, replacing any held direction.
    ///
    /// Returns `false` when no Tokio runtime is available; nothing is started.
    pub fn start<E>(&mut self, direction: Direction, events: &mpsc::UnboundedSender<E>) -> bool
    where
        E: From<StepTick> + Send + 'static,
    {
        self.stop();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return false;
        };

        self.ticket += 1;
        let ticket = self.ticket;
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let events = events.clone();
        let config = self.config;

        self.running.fetch_add(1, Ordering::SeqCst);
        let guard = RunningGuard(Arc::clone(&self.running));

        let handle = runtime.spawn(async move {
            let _guard = guard;
            let first = Instant::now() + config.initial_delay;
            let mut ticker = interval_at(first, config.interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if events.send(E::from(StepTick { ticket, direction })).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        debug!(%direction, ticket, "Continuous stepping started");
        self.held = Some(Held {
            direction,
            cancel,
            handle,
        });
        true
    }

    /// Release the held direction. Returns whether anything was held.
    pub fn stop(&mut self) -> bool {
        match self.held.take() {
            Some(held) => {
                held.cancel.cancel();
                held.handle.abort();
                debug!(direction = %held.direction, ticket = self.ticket, "Continuous stepping stopped");
                true
            }
            None => false,
        }
    }

    /// Whether `tick` belongs to the current press.
    pub fn accepts(&self, tick: &StepTick) -> bool {
        self.held.is_some() && tick.ticket == self.ticket
    }
}

impl Default for ContinuousStepper {
    fn default() -> Self {
        Self::new(SteppingConfig::default())
    }
}

impl Drop for ContinuousStepper {
    fn drop(&mut self) {
        self.stop();
    }
}
