//! Live position source.
//!
//! Issues a single asynchronous request to the host's location facility.
//! There is no automatic retry: a new request must be triggered explicitly.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──request()──► Pending ──outcome──► Ready(coord) | Unavailable(reason)
//!   ▲                    │
//!   └────cancel()────────┘   (late outcome is discarded)
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::geo::Coordinate;

use super::{AcquisitionError, BoxFuture, PositionSource, PositionStatus};

/// Default hard timeout for a single acquisition.
pub const DEFAULT_ACQUISITION_TIMEOUT: Duration = Duration::from_millis(5000);

/// Options passed to the location provider with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionOptions {
    /// Hard timeout enforced by the source (not only the provider).
    pub timeout: Duration,
    /// Maximum age of a cached fix the provider may return. Zero always
    /// requests a fresh fix.
    pub maximum_age: Duration,
    /// Ask the provider for its most accurate fix.
    pub high_accuracy: bool,
}

impl Default for AcquisitionOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_ACQUISITION_TIMEOUT,
            maximum_age: Duration::ZERO,
            high_accuracy: true,
        }
    }
}

/// Host facility that can produce the subject's current position.
pub trait LocationProvider: Send + Sync + 'static {
    /// Whether the host has a location capability at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Single-shot request for the current position.
    fn current_position<'a>(
        &'a self,
        options: &'a AcquisitionOptions,
    ) -> BoxFuture<'a, Result<Coordinate, AcquisitionError>>;
}

/// Provider that always answers with the same coordinate.
///
/// Useful for hosts with a known fixed location (and for the terminal
/// front-end, which has no location hardware).
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    position: Coordinate,
    delay: Duration,
}

impl FixedLocationProvider {
    /// Answer immediately with `position`.
    pub fn new(position: Coordinate) -> Self {
        Self {
            position,
            delay: Duration::ZERO,
        }
    }

    /// Answer after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl LocationProvider for FixedLocationProvider {
    fn current_position<'a>(
        &'a self,
        _options: &'a AcquisitionOptions,
    ) -> BoxFuture<'a, Result<Coordinate, AcquisitionError>> {
        Box::pin(async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.position)
        })
    }
}

/// Provider for hosts without any location capability.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedLocationProvider;

impl LocationProvider for UnsupportedLocationProvider {
    fn is_supported(&self) -> bool {
        false
    }

    fn current_position<'a>(
        &'a self,
        _options: &'a AcquisitionOptions,
    ) -> BoxFuture<'a, Result<Coordinate, AcquisitionError>> {
        Box::pin(async {
            Err(AcquisitionError::UnsupportedEnvironment(
                "no location provider".to_string(),
            ))
        })
    }
}

/// Result of one acquisition, posted to the owner's event queue.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionOutcome {
    /// Ticket of the request that produced this outcome.
    pub ticket: u64,
    /// The fix or the failure reason.
    pub result: Result<Coordinate, AcquisitionError>,
}

#[derive(Debug, Clone, PartialEq)]
enum LiveState {
    Idle,
    Pending,
    Ready(Coordinate),
    Unavailable(AcquisitionError),
}

#[derive(Debug)]
struct InFlight {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Position source backed by a host [`LocationProvider`].
pub struct LivePositionSource {
    provider: Arc<dyn LocationProvider>,
    options: AcquisitionOptions,
    state: LiveState,
    ticket: u64,
    in_flight: Option<InFlight>,
}

impl LivePositionSource {
    /// Create an idle source. Nothing is requested until [`request`](Self::request).
    pub fn new(provider: Arc<dyn LocationProvider>, options: AcquisitionOptions) -> Self {
        Self {
            provider,
            options,
            state: LiveState::Idle,
            ticket: 0,
            in_flight: None,
        }
    }

    /// The options used for requests.
    pub fn options(&self) -> &AcquisitionOptions {
        &self.options
    }

    /// Ticket of the most recent request.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Whether a background acquisition task is still held.
    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a new acquisition, superseding any request already in flight.
    ///
    /// The outcome is posted to `events` and must be handed back through
    /// [`apply`](Self::apply). Requires a Tokio runtime; without one, or when
    /// the provider reports no capability, the source becomes unavailable
    /// immediately.
    pub fn request<E>(&mut self, events: &mpsc::UnboundedSender<E>)
    where
        E: From<AcquisitionOutcome> + Send + 'static,
    {
        self.cancel_in_flight();
        self.ticket += 1;

        if !self.provider.is_supported() {
            self.fail(AcquisitionError::UnsupportedEnvironment(
                "host has no location capability".to_string(),
            ));
            return;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                self.fail(AcquisitionError::UnsupportedEnvironment(
                    "no async runtime available".to_string(),
                ));
                return;
            }
        };

        let ticket = self.ticket;
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let provider = Arc::clone(&self.provider);
        let options = self.options.clone();
        let events = events.clone();

        let handle = runtime.spawn(async move {
            let timeout = options.timeout;
            let result = tokio::select! {
                _ = task_cancel.cancelled() => {
                    debug!(ticket, "Acquisition cancelled before completion");
                    return;
                }
                answer = tokio::time::timeout(timeout, provider.current_position(&options)) => {
                    match answer {
                        Ok(result) => result,
                        Err(_) => Err(AcquisitionError::Timeout(timeout)),
                    }
                }
            };

            if task_cancel.is_cancelled() {
                return;
            }
            let _ = events.send(E::from(AcquisitionOutcome { ticket, result }));
        });

        debug!(ticket, timeout_ms = self.options.timeout.as_millis() as u64, "Acquisition started");
        self.state = LiveState::Pending;
        self.in_flight = Some(InFlight { cancel, handle });
    }

    /// Apply an outcome from the event queue.
    ///
    /// Returns `false` (and changes nothing) if the outcome belongs to a
    /// request that has since been cancelled or superseded.
    pub fn apply(&mut self, outcome: AcquisitionOutcome) -> bool {
        if outcome.ticket != self.ticket || self.state != LiveState::Pending {
            debug!(
                ticket = outcome.ticket,
                current = self.ticket,
                "Ignoring stale acquisition outcome"
            );
            return false;
        }

        self.in_flight = None;
        match outcome.result {
            Ok(position) => {
                debug!(ticket = outcome.ticket, %position, "Acquisition succeeded");
                self.state = LiveState::Ready(position);
            }
            Err(e) => self.fail(e),
        }
        true
    }

    /// Cancel any pending request and forget the position.
    ///
    /// The source returns to idle: ready, with no position.
    pub fn cancel(&mut self) {
        if self.cancel_in_flight() {
            // Invalidate anything the task may already have queued.
            self.ticket += 1;
        }
        self.state = LiveState::Idle;
    }

    fn cancel_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.cancel.cancel();
                in_flight.handle.abort();
                true
            }
            None => false,
        }
    }

    fn fail(&mut self, error: AcquisitionError) {
        warn!(reason = %error, "Live position unavailable");
        self.in_flight = None;
        self.state = LiveState::Unavailable(error);
    }
}

impl PositionSource for LivePositionSource {
    fn current_position(&self) -> Option<Coordinate> {
        match self.state {
            LiveState::Ready(position) => Some(position),
            _ => None,
        }
    }

    fn status(&self) -> PositionStatus {
        match &self.state {
            LiveState::Idle | LiveState::Ready(_) => PositionStatus::Ready,
            LiveState::Pending => PositionStatus::Pending,
            LiveState::Unavailable(e) => PositionStatus::Unavailable(e.clone()),
        }
    }
}

impl Drop for LivePositionSource {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

impl std::fmt::Debug for LivePositionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LivePositionSource")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("ticket", &self.ticket)
            .field("in_flight", &self.in_flight.is_some())
            .finish()
    }
}
