//! Report writer trait and errors

use crate::crawler::CrawlResult;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Can't write to {0}: not a file")]
    NotAFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Persists a finished crawl
pub trait ReportWriter {
    /// Writes `result` to `path`
    ///
    /// # Arguments
    ///
    /// * `result` - The finished crawl
    /// * `path` - Destination file; parent directories are created as needed
    fn save(&self, result: &CrawlResult, path: &Path) -> ReportResult<()>;
}
