//! Plain-text crawl report
//!
//! One report block per crawl. Writing to a file that already holds a report
//! appends a new block after a dashed separator, so repeated runs build up a
//! history.

use crate::crawler::{CrawlPage, CrawlResult};
use crate::output::traits::{ReportError, ReportResult, ReportWriter};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Line written between consecutive reports in the same file
pub const SEPARATOR: &str =
    "--------------------------------------------------------------------------------";

/// Writes the plain-text report format
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReportWriter;

impl ReportWriter for TextReportWriter {
    fn save(&self, result: &CrawlResult, path: &Path) -> ReportResult<()> {
        generate_text_report(result, path)
    }
}

/// Writes a report for `result`, appending if `path` already has content
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(ReportError)` - `path` is not a regular file or could not be written
pub fn generate_text_report(result: &CrawlResult, path: &Path) -> ReportResult<()> {
    let append = match fs::metadata(path) {
        Ok(meta) if !meta.is_file() => {
            return Err(ReportError::NotAFile(path.display().to_string()));
        }
        Ok(meta) => meta.len() > 0,
        Err(_) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            false
        }
    };

    let mut text = String::new();
    if append {
        text.push_str(&format!("\n\n{}\n\n", SEPARATOR));
    }
    text.push_str(&format_report(result));

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())?;

    Ok(())
}

/// Formats a crawl result as a plain-text report block
pub fn format_report(result: &CrawlResult) -> String {
    let mut out = String::new();

    // Header
    out.push_str(&format!("Starting URL: {}\n", result.seed_url));
    out.push_str(&format!(
        "Start Time: {}\n",
        result.start_time.format("%m/%d/%Y %I:%M:%S %p UTC")
    ));
    out.push_str(&format!(
        "Duration: {:.2} minutes",
        result.duration.as_secs_f64() / 60.0
    ));
    if result.canceled {
        out.push_str(" - CANCELED !!!");
    }
    out.push('\n');

    if result.pages.is_empty() {
        out.push_str("\nNo pages found!!!\n");
        return out;
    }

    for page in &result.pages {
        format_page(&mut out, page);
    }

    out
}

fn format_page(out: &mut String, page: &CrawlPage) {
    out.push_str(&format!("\nPage: {}\n", page.url));

    if let Some(error) = &page.load_error {
        out.push_str(&format!(" - Load Error: {}\n", error));
        return;
    }

    out.push_str(&format!(
        " - Title: {}\n",
        page.title.as_deref().unwrap_or_default()
    ));
    format_links(out, "Internal Links", &page.internal_links);
    format_links(out, "External Links", &page.external_links);
    format_links(out, "Content Links", &page.content_links);
}

fn format_links(out: &mut String, label: &str, links: &[String]) {
    if links.is_empty() {
        out.push_str(&format!(" - {}: NONE\n", label));
        return;
    }

    out.push_str(&format!(" - {}:\n", label));
    for link in links {
        out.push_str(&format!("     {}\n", link));
    }
}
