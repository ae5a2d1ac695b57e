//! Page fetcher implementation
//!
//! This module defines the `Fetcher` seam used by crawl workers and the
//! HTTP implementation used in production:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with redirect following and per-page timeouts
//! - Content-Type checking
//! - Error classification into load errors
//! - Abandoning in-flight requests on cancellation

use crate::config::UserAgentConfig;
use crate::crawler::parser::parse_html;
use crate::state::PageDetails;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Loads a page and extracts its references
///
/// Implementations are shared by every worker, so they must be safe to call
/// concurrently. A fetch that is blocked on I/O must give up promptly once
/// `cancel` is triggered; the engine additionally drops the fetch future on
/// cancellation, so anything that cannot be interrupted cooperatively is
/// aborted at its next await point.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the page at `url` (already canonical)
    ///
    /// # Returns
    ///
    /// * `Ok(PageDetails)` - Title and classified references
    /// * `Err(FetchError)` - The page could not be loaded; recorded as its load error
    async fn fetch(&self, url: &str, cancel: &CancellationToken)
        -> Result<PageDetails, FetchError>;
}

/// Maximum number of redirects followed for one page
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout; `None` means no timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_sweep::config::UserAgentConfig;
/// use site_sweep::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Some(Duration::from_secs(10))).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Option<Duration>,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent_string())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the user agent configuration
    pub fn new(config: &UserAgentConfig, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config, timeout)?))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Sends the request and turns the response into page details
    ///
    /// # Request Flow
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Non-2xx status (after redirects) | `FetchError::Status` |
    /// | Content-Type not HTML | `FetchError::UnsupportedContent` |
    /// | Timeout | `FetchError::Timeout` |
    /// | Other transport error | `FetchError::Http` |
    async fn load(&self, url: &str) -> Result<PageDetails, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return Err(FetchError::UnsupportedContent {
                url: url.to_string(),
                content_type,
            });
        }

        // Relative references resolve against where we ended up, not where we asked
        let base_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(parse_html(&body, &base_url))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<PageDetails, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Canceled { url: url.to_string() }),
            result = self.load(url) => result,
        }
    }
}

/// Returns true for HTML and XHTML content types
fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

/// Maps a transport error onto a fetch error
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
