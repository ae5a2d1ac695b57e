/// Reduces a URL string to the form used for identity and deduplication
///
/// # Canonicalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Lowercase the scheme and authority (`scheme://host[:port]`)
/// 3. Strip a single trailing `/`
///
/// The path and query keep their case: `/Docs` and `/docs` are distinct pages
/// on most servers.
///
/// No parsing is performed, so this never fails; strings that are not URLs are
/// only trimmed and stripped.
///
/// # Examples
///
/// ```
/// use site_sweep::url::canonicalize;
///
/// assert_eq!(canonicalize("  HTTP://Example.COM/Page/ "), "http://example.com/Page");
/// assert_eq!(canonicalize("http://example.com/"), "http://example.com");
/// ```
pub fn canonicalize(url: &str) -> String {
    let trimmed = url.trim();
    let mut canonical = String::with_capacity(trimmed.len());

    match trimmed.find("://") {
        Some(idx) => {
            let authority_start = idx + 3;
            let authority_end = trimmed[authority_start..]
                .find(['/', '?', '#'])
                .map(|offset| authority_start + offset)
                .unwrap_or(trimmed.len());

            canonical.push_str(&trimmed[..authority_end].to_lowercase());
            canonical.push_str(&trimmed[authority_end..]);
        }
        None => canonical.push_str(trimmed),
    }

    if canonical.ends_with('/') {
        canonical.pop();
    }

    canonical
}
