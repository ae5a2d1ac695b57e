use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Site-Sweep
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; also defines the crawl origin
    #[serde(rename = "starting-url")]
    pub starting_url: String,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "num-threads")]
    pub num_threads: i64,

    /// Minimum time between progress events (milliseconds, <= 0 disables)
    #[serde(rename = "progress-interval-millis")]
    pub progress_interval_millis: i64,

    /// Per-page load timeout (milliseconds, <= 0 means none)
    #[serde(rename = "parse-timeout-millis")]
    pub parse_timeout_millis: i64,

    /// Whole-crawl timeout before cancellation (seconds)
    #[serde(rename = "crawl-timeout-seconds")]
    pub crawl_timeout_seconds: i64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            starting_url: String::new(),
            num_threads: 8,
            progress_interval_millis: 1000,
            parse_timeout_millis: 10_000,
            crawl_timeout_seconds: 300,
        }
    }
}

impl CrawlerConfig {
    /// Number of workers, never below one
    pub fn workers(&self) -> usize {
        usize::try_from(self.num_threads).unwrap_or(0).max(1)
    }

    /// Interval between progress events; zero disables them
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.progress_interval_millis).unwrap_or(0))
    }

    /// Per-page timeout, if any
    pub fn parse_timeout(&self) -> Option<Duration> {
        u64::try_from(self.parse_timeout_millis)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Time the crawl may run before it is canceled
    pub fn crawl_timeout(&self) -> Duration {
        Duration::from_secs(u64::try_from(self.crawl_timeout_seconds).unwrap_or(0))
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SiteSweep".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: String::new(),
            contact_email: String::new(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Contact details are appended only when configured:
    /// `SiteSweep/0.1.0 (+https://example.com/about; ops@example.com)`
    pub fn user_agent_string(&self) -> String {
        let mut contact = Vec::new();
        if !self.contact_url.is_empty() {
            contact.push(format!("+{}", self.contact_url));
        }
        if !self.contact_email.is_empty() {
            contact.push(self.contact_email.clone());
        }

        if contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contact.join("; ")
            )
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the report is written to
    #[serde(rename = "output-path")]
    pub output_path: String,

    /// Report file name inside `output_path`
    #[serde(rename = "result-file")]
    pub result_file: String,
}

impl OutputConfig {
    /// Full path of the report file
    pub fn report_path(&self) -> PathBuf {
        PathBuf::from(&self.output_path).join(&self.result_file)
    }
}
