//! Crawl engine - orchestration of a single same-origin crawl
//!
//! The engine owns the frontier and the worker pool for exactly one crawl:
//! - Validating the seed and computing the origin
//! - Registering the seed and submitting its fetch
//! - Waiting for the pool to quiesce, with a timeout
//! - Cancelling in-flight fetches within a grace period
//! - Building the result once the pool has stopped

use crate::crawler::events::{EventGate, EventHandler};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::result::{CrawlPage, CrawlResult};
use crate::crawler::worker::{self, CrawlRun};
use crate::state::CrawlState;
use crate::url::{canonicalize, Origin};
use crate::{CrawlError, UrlError};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use url::Url;

/// Minimum number of concurrent workers
pub const MIN_WORKERS: usize = 1;

/// How long `cancel` waits for in-flight tasks to unwind
pub const DEFAULT_CANCEL_GRACE: Duration = Duration::from_secs(10);

/// Crawls every page reachable from a seed inside the seed's origin
///
/// An engine runs at most one crawl; a second `start` fails.
///
/// # Example
///
/// ```no_run
/// use site_sweep::config::UserAgentConfig;
/// use site_sweep::crawler::{CrawlEngine, HttpFetcher, NoopEventHandler};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = HttpFetcher::new(&UserAgentConfig::default(), Some(Duration::from_secs(10)))?;
/// let engine = CrawlEngine::new(8, Arc::new(fetcher));
///
/// engine.start("https://example.com/", Arc::new(NoopEventHandler))?;
/// if !engine.wait(Duration::from_secs(60)).await {
///     engine.cancel().await;
/// }
///
/// let result = engine.result()?;
/// println!("{} pages", result.pages.len());
/// # Ok(())
/// # }
/// ```
pub struct CrawlEngine {
    workers: usize,
    progress_interval: Option<Duration>,
    cancel_grace: Duration,
    fetcher: Arc<dyn Fetcher>,
    run: OnceLock<Arc<CrawlRun>>,
}

impl CrawlEngine {
    /// Creates an engine with `workers` concurrent fetches
    ///
    /// Values below `MIN_WORKERS` are clamped. Progress events are disabled
    /// until `with_progress_interval` is called.
    pub fn new(workers: usize, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            workers: workers.max(MIN_WORKERS),
            progress_interval: None,
            cancel_grace: DEFAULT_CANCEL_GRACE,
            fetcher,
            run: OnceLock::new(),
        }
    }

    /// Sets the minimum time between progress events; zero disables them
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = (!interval.is_zero()).then_some(interval);
        self
    }

    /// Sets how long `cancel` waits for tasks to unwind
    pub fn with_cancel_grace(mut self, grace: Duration) -> Self {
        self.cancel_grace = grace;
        self
    }

    /// Number of concurrent workers
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Starts crawling from `seed_url` and returns without blocking
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// * `CrawlError::AlreadyStarted` - This engine already ran a crawl
    /// * `CrawlError::MalformedUrl` - The seed has no usable scheme and host
    /// * `CrawlError::NoRuntime` - Called outside a tokio runtime
    ///
    /// Nothing is scheduled when an error is returned.
    pub fn start(&self, seed_url: &str, handler: Arc<dyn EventHandler>) -> Result<(), CrawlError> {
        if self.run.get().is_some() {
            return Err(CrawlError::AlreadyStarted);
        }

        let origin = Origin::from_seed(seed_url)?;
        tokio::runtime::Handle::try_current().map_err(|_| CrawlError::NoRuntime)?;

        // Same serialization as links resolved from pages, so default ports match
        let parsed = Url::parse(seed_url.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        let seed = canonicalize(parsed.as_str());
        let run = Arc::new(CrawlRun {
            seed_url: seed_url.trim().to_string(),
            origin,
            start_time: Utc::now(),
            frontier: Frontier::new(),
            processed: AtomicUsize::new(0),
            canceled: AtomicBool::new(false),
            cancel_token: CancellationToken::new(),
            tracker: TaskTracker::new(),
            permits: Semaphore::new(self.workers),
            fetcher: Arc::clone(&self.fetcher),
            events: EventGate::new(handler, self.progress_interval, Instant::now()),
        });

        self.run
            .set(Arc::clone(&run))
            .map_err(|_| CrawlError::AlreadyStarted)?;

        tracing::info!(
            "Starting crawl of {} (origin {}) with {} workers",
            seed,
            run.origin,
            self.workers
        );

        run.frontier.try_register(&seed);
        worker::submit(&run, seed);

        Ok(())
    }

    /// Waits until the worker pool has terminated or `timeout` elapses
    ///
    /// Returns true if the pool terminated. Returns true immediately if the
    /// crawl was never started.
    pub async fn wait(&self, timeout: Duration) -> bool {
        match self.run.get() {
            Some(run) => tokio::time::timeout(timeout, run.tracker.wait())
                .await
                .is_ok(),
            None => true,
        }
    }

    /// Cancels the crawl and waits for in-flight fetches to unwind
    ///
    /// In-flight fetches are interrupted and no new page is registered. If the
    /// tasks do not stop within the grace period this returns false and the
    /// crawl must be treated as failed; its state is not reconciled.
    ///
    /// Returns true (doing nothing) if the crawl was never started. If the
    /// crawl has already completed this only waits, within the grace period,
    /// for the task that completed it to exit.
    pub async fn cancel(&self) -> bool {
        let Some(run) = self.run.get() else {
            return true;
        };

        if run.events.completion().is_some() {
            return self.await_tasks(run).await;
        }

        tracing::info!("Canceling crawl of {}", run.origin);

        run.canceled.store(true, Ordering::SeqCst);
        run.cancel_token.cancel();
        run.tracker.close();

        if !self.await_tasks(run).await {
            return false;
        }

        run.finish(true);
        true
    }

    /// Waits up to the cancel grace period for every task to exit
    async fn await_tasks(&self, run: &CrawlRun) -> bool {
        if tokio::time::timeout(self.cancel_grace, run.tracker.wait())
            .await
            .is_err()
        {
            tracing::error!(
                "{} tasks still running {:?} after cancel",
                run.tracker.len(),
                self.cancel_grace
            );
            return false;
        }
        true
    }

    /// Current lifecycle state
    ///
    /// A crawl stays `Running` until completion has fired and every task has
    /// exited, so a terminal state always has a result available.
    pub fn state(&self) -> CrawlState {
        let Some(run) = self.run.get() else {
            return CrawlState::NotStarted;
        };
        if !run.is_terminated() {
            return CrawlState::Running;
        }
        match run.events.completion() {
            Some(c) if c.canceled => CrawlState::Canceled,
            Some(_) => CrawlState::Completed,
            None => CrawlState::Running,
        }
    }

    /// Builds the crawl result from the frontier
    ///
    /// # Errors
    ///
    /// * `CrawlError::NotStarted` - `start` was never called
    /// * `CrawlError::StillRunning` - The pool has not terminated yet
    pub fn result(&self) -> Result<CrawlResult, CrawlError> {
        let run = self.run.get().ok_or(CrawlError::NotStarted)?;
        if !run.is_terminated() {
            return Err(CrawlError::StillRunning);
        }

        let completion = run.events.completion().ok_or(CrawlError::StillRunning)?;
        let pages = run
            .frontier
            .snapshot()
            .into_iter()
            .map(|record| CrawlPage::from_record(record, &run.origin))
            .collect();

        Ok(CrawlResult {
            seed_url: run.seed_url.clone(),
            origin: run.origin.to_string(),
            start_time: run.start_time,
            duration: completion.duration,
            canceled: completion.canceled,
            processed: completion.processed,
            pages,
        })
    }

    /// When the crawl started, if it has
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.run.get().map(|run| run.start_time)
    }

    /// Time from start to completion; zero until completion fires
    pub fn duration(&self) -> Duration {
        self.run
            .get()
            .and_then(|run| run.events.completion())
            .map(|c| c.duration)
            .unwrap_or(Duration::ZERO)
    }

    /// Whether the crawl was canceled
    ///
    /// Once completion has fired this matches the completion record; before
    /// that it reports whether cancellation has been requested.
    pub fn is_canceled(&self) -> bool {
        self.run.get().is_some_and(|run| {
            run.events
                .completion()
                .map(|c| c.canceled)
                .unwrap_or_else(|| run.is_canceled())
        })
    }

    /// Pages processed so far
    pub fn processed(&self) -> usize {
        self.run
            .get()
            .map(|run| run.processed.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Pages discovered so far
    pub fn discovered(&self) -> usize {
        self.run.get().map(|run| run.frontier.size()).unwrap_or(0)
    }
}
