//! Output module for writing crawl reports
//!
//! This module handles:
//! - Formatting a `CrawlResult` as a plain-text report
//! - Appending reports to an existing report file

mod report;
mod traits;

pub use report::{format_report, generate_text_report, TextReportWriter, SEPARATOR};
pub use traits::{ReportError, ReportResult, ReportWriter};
