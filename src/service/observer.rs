//! Observer interface for crawl service runs

use crate::crawler::EventHandler;
use std::path::Path;
use std::sync::Arc;

/// Receiver of crawl service notifications
///
/// Every method has an empty default so observers only implement what they
/// care about.
pub trait ServiceObserver: Send + Sync {
    /// The crawl is about to start from `starting_url`
    fn on_start(&self, starting_url: &str) {
        let _ = starting_url;
    }

    /// The configuration was rejected; nothing was crawled
    fn on_error(&self, errors: &[String]) {
        let _ = errors;
    }

    /// Some pages have been processed since the last progress event
    fn on_progress(&self, processed: usize) {
        let _ = processed;
    }

    /// The crawl finished and its report was written to `report_path`
    fn on_complete(&self, processed: usize, canceled: bool, report_path: &Path) {
        let _ = (processed, canceled, report_path);
    }
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ServiceObserver for NoopObserver {}

/// Forwards engine progress events to a service observer
///
/// Engine completion is not forwarded: the service reports completion itself
/// once the report has been written.
pub(crate) struct ProgressForwarder {
    observer: Arc<dyn ServiceObserver>,
}

impl ProgressForwarder {
    pub(crate) fn new(observer: Arc<dyn ServiceObserver>) -> Self {
        Self { observer }
    }
}

impl EventHandler for ProgressForwarder {
    fn on_progress(&self, processed: usize) {
        self.observer.on_progress(processed);
    }

    fn on_complete(&self, processed: usize, canceled: bool) {
        tracing::debug!(
            "Engine completion: {} processed, canceled: {}",
            processed,
            canceled
        );
    }
}
