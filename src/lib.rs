//! Site-Sweep: a same-origin site mapper
//!
//! This crate discovers every page reachable by hyperlinks from a seed URL
//! without leaving the seed's origin. Each page is fetched exactly once by a
//! bounded pool of concurrent workers, its references are classified, and the
//! aggregate result is written to a plain-text report.

pub mod config;
pub mod crawler;
pub mod output;
pub mod service;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] CrawlError),

    #[error("Report error: {0}")]
    Report(#[from] output::ReportError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Usage and lifecycle errors raised by the crawl engine
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Malformed seed URL: {0}")]
    MalformedUrl(#[from] UrlError),

    #[error("The crawler is already started")]
    AlreadyStarted,

    #[error("The crawler has not started")]
    NotStarted,

    #[error("The crawler is running")]
    StillRunning,

    #[error("No async runtime available to run the crawl")]
    NoRuntime,

    #[error("Workers did not stop within {0:?} of cancellation")]
    CancelTimeout(std::time::Duration),
}

/// Errors produced while fetching a single page
///
/// These never abort a crawl; they become the page's load error.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Unable to load {url}. CAUSE: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unable to load {url}. CAUSE: timeout")]
    Timeout { url: String },

    #[error("Unable to load {url}. CAUSE: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Unable to load {url}. CAUSE: unsupported content type '{content_type}'")]
    UnsupportedContent { url: String, content_type: String },

    #[error("Fetch of {url} was canceled")]
    Canceled { url: String },

    #[error("Unable to load {url}. CAUSE: {message}")]
    Other { url: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl ConfigError {
    /// Returns the individual problems found, one message per entry
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Invalid(errors) => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Site-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlResult, EventHandler, Fetcher, HttpFetcher};
pub use state::{CrawlState, LinkRef, PageDetails, PageOutcome};
pub use url::{canonicalize, Origin};
