use crate::url::canonicalize;
use crate::UrlError;
use std::fmt;
use url::Url;

/// The crawl boundary: `scheme://host[:port]` of the seed URL
///
/// A URL is in-origin when its canonical form, compared case-insensitively,
/// starts with the origin string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(String);

impl Origin {
    /// Derives the origin from a seed URL
    ///
    /// # Arguments
    ///
    /// * `seed` - The seed URL; surrounding whitespace is ignored
    ///
    /// # Returns
    ///
    /// * `Ok(Origin)` - The lowercase `scheme://host[:port]` prefix
    /// * `Err(UrlError)` - The seed does not parse, is not HTTP(S) or has no host
    ///
    /// # Examples
    ///
    /// ```
    /// use site_sweep::url::Origin;
    ///
    /// let origin = Origin::from_seed("http://Example.com:8080/a/b").unwrap();
    /// assert_eq!(origin.as_str(), "http://example.com:8080");
    /// assert!(origin.contains("http://example.com:8080/c"));
    /// assert!(!origin.contains("https://example.com:8080/c"));
    /// ```
    pub fn from_seed(seed: &str) -> Result<Self, UrlError> {
        let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(UrlError::MissingHost)?;

        let origin = match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        };

        Ok(Self(origin.to_lowercase()))
    }

    /// Returns the origin string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the URL falls inside this origin
    pub fn contains(&self, url: &str) -> bool {
        canonicalize(url).to_lowercase().starts_with(&self.0)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
