//! Crawl service
//!
//! Runs one crawl end to end from a `Config`:
//! 1. Validate the configuration (reporting every problem to the observer)
//! 2. Start the engine with an HTTP fetcher
//! 3. Wait for the crawl, canceling it if the crawl timeout elapses
//! 4. Write the report and notify the observer

mod observer;

pub use observer::{NoopObserver, ServiceObserver};

use crate::config::{validate, Config};
use crate::crawler::{CrawlEngine, Fetcher, HttpFetcher, DEFAULT_CANCEL_GRACE};
use crate::output::{ReportWriter, TextReportWriter};
use crate::{CrawlError, Result};
use observer::ProgressForwarder;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long each wait slice lasts when progress events are disabled
const DEFAULT_WAIT_SLICE: Duration = Duration::from_secs(1);

/// Outcome of a completed service run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSummary {
    /// Pages processed when the crawl completed
    pub processed: usize,

    /// Pages discovered, including any left unprocessed by cancellation
    pub discovered: usize,

    /// Whether the crawl timed out and was canceled
    pub canceled: bool,

    /// Time from start to completion
    pub duration: Duration,

    /// Where the report was written
    pub report_path: PathBuf,
}

/// Runs a configured crawl and writes its report
pub struct CrawlService {
    config: Config,
    fetcher: Option<Arc<dyn Fetcher>>,
    cancel_grace: Duration,
}

impl CrawlService {
    /// Creates a service that fetches pages over HTTP
    pub fn new(config: Config) -> Self {
        Self {
            config,
            fetcher: None,
            cancel_grace: DEFAULT_CANCEL_GRACE,
        }
    }

    /// Replaces the HTTP fetcher
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Sets how long a timed-out crawl may take to unwind
    pub fn with_cancel_grace(mut self, grace: Duration) -> Self {
        self.cancel_grace = grace;
        self
    }

    /// Runs the crawl to completion or timeout
    ///
    /// # Returns
    ///
    /// * `Ok(ServiceSummary)` - The crawl finished and the report was written
    /// * `Err(SweepError)` - The configuration was invalid, the crawl could
    ///   not be started or stopped, or the report could not be written
    pub async fn run(&self, observer: Arc<dyn ServiceObserver>) -> Result<ServiceSummary> {
        let mut config = self.config.clone();
        if let Err(e) = validate(&mut config) {
            observer.on_error(&e.messages());
            return Err(e.into());
        }

        let starting_url = config.crawler.starting_url.trim().to_string();
        observer.on_start(&starting_url);

        let fetcher: Arc<dyn Fetcher> = match &self.fetcher {
            Some(fetcher) => Arc::clone(fetcher),
            None => Arc::new(HttpFetcher::new(
                &config.user_agent,
                config.crawler.parse_timeout(),
            )?),
        };

        let progress_interval = config.crawler.progress_interval();
        let engine = CrawlEngine::new(config.crawler.workers(), fetcher)
            .with_progress_interval(progress_interval)
            .with_cancel_grace(self.cancel_grace);

        engine.start(
            &starting_url,
            Arc::new(ProgressForwarder::new(Arc::clone(&observer))),
        )?;

        let slice = if progress_interval.is_zero() {
            DEFAULT_WAIT_SLICE
        } else {
            progress_interval
        };
        let timeout = config.crawler.crawl_timeout();
        if !wait_for_crawl(&engine, slice, timeout).await {
            tracing::warn!("Crawl timeout of {:?} elapsed, canceling", timeout);
            if !engine.cancel().await {
                tracing::error!("Cancel after crawl timeout failed");
                return Err(CrawlError::CancelTimeout(self.cancel_grace).into());
            }
        }

        let result = engine.result()?;
        let report_path = config.output.report_path();
        TextReportWriter.save(&result, &report_path)?;
        tracing::info!("Report written to {}", report_path.display());

        observer.on_complete(result.processed, result.canceled, &report_path);

        Ok(ServiceSummary {
            processed: result.processed,
            discovered: result.pages.len(),
            canceled: result.canceled,
            duration: result.duration,
            report_path,
        })
    }
}

/// Waits in slices until the crawl terminates or `timeout` elapses
///
/// Returns true if the crawl terminated.
async fn wait_for_crawl(engine: &CrawlEngine, slice: Duration, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return false;
        }
        if engine.wait(slice.min(remaining)).await {
            return true;
        }
        tracing::trace!(
            "Waiting on crawl: {} processed, {} discovered",
            engine.processed(),
            engine.discovered()
        );
    }
}
