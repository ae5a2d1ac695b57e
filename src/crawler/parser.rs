//! HTML parser for extracting page references and metadata
//!
//! This module handles parsing HTML content to extract:
//! - The page title
//! - Imports (`<link href>`), recorded but never followed
//! - Media (any element with `src`), recorded but never followed
//! - Links (`<a href>`), followed when they stay inside the crawl origin

use crate::state::{LinkRef, PageDetails};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Parses HTML content and extracts the title and all references
///
/// # Link Extraction Rules
///
/// **Links** (`<a href>`) exclude:
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only (same page) anchors
/// - Anything that does not resolve to an HTTP(S) URL
///
/// **Imports and media** keep any reference that resolves to an absolute URL,
/// except data URIs.
///
/// Every reference is resolved against `base_url` and annotated with the tag
/// name of the element that carried it.
///
/// # Example
///
/// ```
/// use site_sweep::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let page = parse_html(html, &base_url);
/// assert_eq!(page.title, Some("Test".to_string()));
/// assert_eq!(page.links.iter().next().unwrap().url, "https://example.com/page");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> PageDetails {
    let document = Html::parse_document(html);

    PageDetails {
        title: extract_title(&document),
        imports: collect(&document, "link[href]", "href", |v| {
            resolve_reference(v, base_url)
        }),
        media: collect(&document, "[src]", "src", |v| resolve_reference(v, base_url)),
        links: collect(&document, "a[href]", "href", |v| resolve_link(v, base_url)),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects the resolved attribute values of every element matching `selector`
fn collect<F>(document: &Html, selector: &str, attr: &str, resolve: F) -> BTreeSet<LinkRef>
where
    F: Fn(&str) -> Option<String>,
{
    let Ok(selector) = Selector::parse(selector) else {
        return BTreeSet::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let value = element.value().attr(attr)?;
            let url = resolve(value)?;
            Some(LinkRef::new(element.value().name(), url))
        })
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}

/// Resolves an import or media reference to an absolute URL
fn resolve_reference(value: &str, base_url: &Url) -> Option<String> {
    let value = value.trim();

    if value.is_empty() || value.to_ascii_lowercase().starts_with("data:") {
        return None;
    }

    base_url.join(value).ok().map(|u| u.to_string())
}
