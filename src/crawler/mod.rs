//! Crawler module for same-origin page discovery
//!
//! This module contains the core crawling logic, including:
//! - The page frontier with insert-if-absent registration
//! - HTTP fetching behind the `Fetcher` seam
//! - HTML parsing and reference extraction
//! - A bounded worker pool with quiescence detection and cancellation
//! - Progress and completion events
//! - Translation of the frontier into a `CrawlResult`

mod engine;
mod events;
mod fetcher;
mod frontier;
mod parser;
mod result;
mod worker;

pub use engine::{CrawlEngine, DEFAULT_CANCEL_GRACE, MIN_WORKERS};
pub use events::{Completion, EventHandler, NoopEventHandler};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use parser::parse_html;
pub use result::{CrawlPage, CrawlResult, NOT_PARSED};
