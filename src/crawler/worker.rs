//! Fetch-expand-submit worker task
//!
//! Every discovered URL gets exactly one task. The task fetches the page,
//! records the outcome, registers in-origin links it discovered and spawns a
//! task for each one it won, then counts itself as processed. Because the
//! registrations happen before the count, a task that sees
//! `processed == frontier.size()` knows no work is left anywhere.

use crate::crawler::events::EventGate;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::state::PageOutcome;
use crate::url::{canonicalize, Origin};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// State shared by every task of one crawl run
pub(crate) struct CrawlRun {
    pub(crate) seed_url: String,
    pub(crate) origin: Origin,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) frontier: Frontier,
    pub(crate) processed: AtomicUsize,
    pub(crate) canceled: AtomicBool,
    pub(crate) cancel_token: CancellationToken,
    pub(crate) tracker: TaskTracker,
    pub(crate) permits: Semaphore,
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) events: EventGate,
}

impl CrawlRun {
    /// Returns true once cancellation has been requested
    pub(crate) fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    /// Drives the completion protocol and stops the pool from being awaited
    /// any longer than its remaining tasks
    pub(crate) fn finish(&self, canceled: bool) {
        if self.events.complete(&self.processed, canceled) {
            tracing::info!(
                "Crawl of {} {}: {} pages processed, {} discovered",
                self.origin,
                if canceled { "canceled" } else { "complete" },
                self.processed.load(Ordering::SeqCst),
                self.frontier.size()
            );
        }
        self.tracker.close();
    }

    /// True once completion fired and every task has exited
    pub(crate) fn is_terminated(&self) -> bool {
        self.events.completion().is_some() && self.tracker.is_closed() && self.tracker.is_empty()
    }
}

/// Schedules the fetch of a URL this caller has just registered
pub(crate) fn submit(run: &Arc<CrawlRun>, url: String) {
    let task_run = Arc::clone(run);
    run.tracker.spawn(process_page(task_run, url));
}

/// Runs one page through fetch, record, expand and count
async fn process_page(run: Arc<CrawlRun>, url: String) {
    // Queue for a worker slot; a canceled crawl never starts new fetches
    let _permit = tokio::select! {
        biased;
        _ = run.cancel_token.cancelled() => return,
        permit = run.permits.acquire() => match permit {
            Ok(permit) => permit,
            Err(_) => return,
        },
    };

    tracing::debug!("Fetching {}", url);

    let fetched = tokio::select! {
        biased;
        _ = run.cancel_token.cancelled() => {
            tracing::debug!("Fetch of {} abandoned on cancel", url);
            return;
        }
        fetched = run.fetcher.fetch(&url, &run.cancel_token) => fetched,
    };

    // The record stays Pending; the pool is shutting down anyway
    if run.is_canceled() {
        return;
    }

    let outcome = match fetched {
        Ok(details) => PageOutcome::Loaded(details),
        Err(e) => {
            tracing::warn!("{}", e);
            PageOutcome::LoadError {
                message: e.to_string(),
            }
        }
    };

    // Imports and media are leaves; only anchors are expanded
    let children: Vec<String> = outcome
        .details()
        .map(|details| {
            details
                .links
                .iter()
                .filter(|link| run.origin.contains(&link.url))
                .map(|link| canonicalize(&link.url))
                .collect()
        })
        .unwrap_or_default();

    run.frontier.complete(&url, outcome);

    let mut new_links = 0;
    for child in children {
        if run.is_canceled() {
            break;
        }
        if run.frontier.try_register(&child) {
            submit(&run, child);
            new_links += 1;
        }
    }

    let processed = run.processed.fetch_add(1, Ordering::SeqCst) + 1;
    let discovered = run.frontier.size();

    tracing::trace!(
        "Processed {} - processed: {}, new links: {}, discovered: {}",
        url,
        processed,
        new_links,
        discovered
    );

    // A cancel that raced past this task's check still marks the run canceled
    if processed == discovered {
        run.finish(run.is_canceled());
    } else {
        run.events.progress(&run.processed);
    }
}
