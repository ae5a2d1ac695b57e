//! Progress and completion events
//!
//! All event emission goes through one narrow lock. It guarantees that the
//! completion event fires exactly once, freezes the crawl duration at that
//! moment, and keeps progress events from being observed after completion.
//! The lock is never held while a page is being fetched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Receiver of crawl notifications
///
/// Callbacks run on worker tasks while the event lock is held, so they should
/// return quickly and must not call back into the engine's `cancel`.
pub trait EventHandler: Send + Sync {
    /// Some pages have been processed since the last progress event
    fn on_progress(&self, processed: usize) {
        let _ = processed;
    }

    /// The crawl has finished, either by quiescence or by cancellation
    fn on_complete(&self, processed: usize, canceled: bool);
}

/// Handler that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventHandler;

impl EventHandler for NoopEventHandler {
    fn on_complete(&self, _processed: usize, _canceled: bool) {}
}

/// The frozen facts recorded when a crawl completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Pages processed when completion fired
    pub processed: usize,

    /// Whether completion came from cancellation
    pub canceled: bool,

    /// Time from start to completion
    pub duration: Duration,
}

struct GateState {
    completion: Option<Completion>,
    last_progress: Instant,
}

/// Serializes the completion guard and the progress throttle
pub(crate) struct EventGate {
    handler: Arc<dyn EventHandler>,
    progress_interval: Option<Duration>,
    started: Instant,
    state: Mutex<GateState>,
}

impl EventGate {
    /// Creates a gate for a run that started at `started`
    ///
    /// A `progress_interval` of `None` disables progress events.
    pub(crate) fn new(
        handler: Arc<dyn EventHandler>,
        progress_interval: Option<Duration>,
        started: Instant,
    ) -> Self {
        Self {
            handler,
            progress_interval,
            started,
            state: Mutex::new(GateState {
                completion: None,
                last_progress: started,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        // A panicking handler must not wedge every later event
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fires the completion event if no caller has done so yet
    ///
    /// Returns true only for the caller that fired it.
    pub(crate) fn complete(&self, processed: &AtomicUsize, canceled: bool) -> bool {
        let mut state = self.lock();
        if state.completion.is_some() {
            return false;
        }

        let completion = Completion {
            processed: processed.load(Ordering::SeqCst),
            canceled,
            duration: self.started.elapsed(),
        };
        state.completion = Some(completion);

        self.handler
            .on_complete(completion.processed, completion.canceled);
        true
    }

    /// Fires a progress event if the interval has elapsed and the crawl is
    /// not complete
    pub(crate) fn progress(&self, processed: &AtomicUsize) {
        let Some(interval) = self.progress_interval else {
            return;
        };

        let mut state = self.lock();
        if state.completion.is_some() {
            return;
        }

        let now = Instant::now();
        if now.duration_since(state.last_progress) > interval {
            self.handler.on_progress(processed.load(Ordering::SeqCst));
            state.last_progress = now;
        }
    }

    /// Returns the completion record once completion has fired
    pub(crate) fn completion(&self) -> Option<Completion> {
        self.lock().completion
    }
}
