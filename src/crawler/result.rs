//! Crawl result types
//!
//! A `CrawlResult` is built from the frontier once the worker pool has
//! stopped. Each page record is translated into internal, external and content
//! links using the crawl's origin.

use crate::state::{PageOutcome, PageRecord};
use crate::url::Origin;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Load error reported for pages whose fetch never finished
pub const NOT_PARSED: &str = "Not parsed.";

/// Information about one crawled page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlPage {
    /// Canonical URL of the page
    pub url: String,

    /// Page title (if the page loaded and had one)
    pub title: Option<String>,

    /// Why the page could not be loaded
    pub load_error: Option<String>,

    /// Navigational links inside the crawl origin
    pub internal_links: Vec<String>,

    /// Navigational links leaving the crawl origin
    pub external_links: Vec<String>,

    /// Imports followed by media; never crawled
    pub content_links: Vec<String>,
}

impl CrawlPage {
    /// Translates a frontier record into a reportable page
    pub fn from_record(record: PageRecord, origin: &Origin) -> Self {
        let mut page = CrawlPage {
            url: record.url,
            ..Self::default()
        };

        match record.outcome {
            PageOutcome::Pending => page.load_error = Some(NOT_PARSED.to_string()),
            PageOutcome::LoadError { message } => page.load_error = Some(message),
            PageOutcome::Loaded(details) => {
                page.title = details.title;

                let (internal, external): (Vec<_>, Vec<_>) = details
                    .links
                    .into_iter()
                    .map(|link| link.url)
                    .partition(|url| origin.contains(url));
                page.internal_links = internal;
                page.external_links = external;

                page.content_links = details
                    .imports
                    .into_iter()
                    .chain(details.media)
                    .map(|link| link.url)
                    .collect();
            }
        }

        page
    }

    /// Returns true if the page loaded
    pub fn is_loaded(&self) -> bool {
        self.load_error.is_none()
    }
}

/// Aggregate result of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// The seed URL as given to `start`
    pub seed_url: String,

    /// The crawl boundary derived from the seed
    pub origin: String,

    /// When the crawl started
    pub start_time: DateTime<Utc>,

    /// Time from start to completion
    pub duration: Duration,

    /// Whether the crawl was canceled
    pub canceled: bool,

    /// Pages processed when the crawl completed
    pub processed: usize,

    /// Every discovered page, ordered by canonical URL
    pub pages: Vec<CrawlPage>,
}

impl CrawlResult {
    /// Number of pages that loaded successfully
    pub fn loaded_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_loaded()).count()
    }

    /// Looks up a page by canonical URL
    pub fn page(&self, url: &str) -> Option<&CrawlPage> {
        self.pages.iter().find(|p| p.url == url)
    }
}
