//! The discovered-URL registry
//!
//! The frontier maps canonical URL to what the crawl knows about that page. It
//! is both the deduplication mechanism (exactly one caller wins the
//! registration of a URL) and the termination oracle (its size only grows, so
//! it can be compared against the processed count without further locking).

use crate::state::{PageOutcome, PageRecord};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Concurrent, append-only registry of discovered pages
#[derive(Debug, Default)]
pub struct Frontier {
    /// Canonical URL -> outcome; entries are never removed
    records: DashMap<String, PageOutcome>,

    /// Number of successful registrations
    size: AtomicUsize,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a canonical URL as `Pending` if it is not already known
    ///
    /// Returns true only for the single caller that performed the insertion,
    /// no matter how many callers race on the same URL. That caller is the
    /// page's discoverer and is responsible for scheduling its fetch.
    pub fn try_register(&self, canonical_url: &str) -> bool {
        match self.records.entry(canonical_url.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(PageOutcome::Pending);
                self.size.fetch_add(1, Ordering::SeqCst);
                true
            }
        }
    }

    /// Moves a pending page to its final outcome
    ///
    /// Returns false if the URL is unknown or already has a final outcome; the
    /// record is left untouched in that case.
    pub fn complete(&self, canonical_url: &str, outcome: PageOutcome) -> bool {
        match self.records.get_mut(canonical_url) {
            Some(mut record) if record.is_pending() => {
                *record = outcome;
                true
            }
            Some(_) => {
                tracing::warn!("Page {} already has an outcome", canonical_url);
                false
            }
            None => {
                tracing::warn!("Page {} was never registered", canonical_url);
                false
            }
        }
    }

    /// Number of registered pages, pending or complete
    ///
    /// Never decreases during a run.
    pub fn size(&self) -> usize {
        self.size.load(Ordering::SeqCst)
    }

    /// Returns true if no page has been registered
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns a copy of one page's outcome
    pub fn get(&self, canonical_url: &str) -> Option<PageOutcome> {
        self.records.get(canonical_url).map(|r| r.value().clone())
    }

    /// Copies every record, ordered by canonical URL
    ///
    /// Only meaningful once the worker pool has stopped; taken while workers
    /// are running it is a point-in-time view of a moving target.
    pub fn snapshot(&self) -> Vec<PageRecord> {
        let mut records: Vec<PageRecord> = self
            .records
            .iter()
            .map(|entry| PageRecord {
                url: entry.key().clone(),
                outcome: entry.value().clone(),
            })
            .collect();

        records.sort_by(|a, b| a.url.cmp(&b.url));
        records
    }
}
