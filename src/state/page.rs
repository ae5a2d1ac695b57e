/// Page record definitions for tracking crawl progress
///
/// This module defines what the crawl learns about a page: the references it
/// carries and the outcome of fetching it.
use std::collections::BTreeSet;
use std::fmt;

/// An outbound reference found on a page
///
/// Equality is by (tag, url); the tag names the markup element that carried
/// the reference (`a`, `link`, `img`, `script`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkRef {
    /// The source element's tag name
    pub tag: String,

    /// The absolute URL of the reference
    pub url: String,
}

impl LinkRef {
    /// Creates a new link reference
    pub fn new(tag: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            url: url.into(),
        }
    }
}

/// Extracted information from a successfully loaded page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDetails {
    /// The page title (from the `<title>` tag)
    pub title: Option<String>,

    /// Imported resources (`<link href>`); recorded, never followed
    pub imports: BTreeSet<LinkRef>,

    /// Embedded media and scripts (`[src]`); recorded, never followed
    pub media: BTreeSet<LinkRef>,

    /// Navigational links (`<a href>`); followed when in-origin
    pub links: BTreeSet<LinkRef>,
}

impl PageDetails {
    /// Creates page details with a title and no references
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Adds a navigational link, returning self for chaining
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.links.insert(LinkRef::new("a", url));
        self
    }

    /// Adds an imported resource, returning self for chaining
    pub fn with_import(mut self, url: impl Into<String>) -> Self {
        self.imports.insert(LinkRef::new("link", url));
        self
    }

    /// Adds a media reference, returning self for chaining
    pub fn with_media(mut self, tag: impl Into<String>, url: impl Into<String>) -> Self {
        self.media.insert(LinkRef::new(tag, url));
        self
    }
}

/// Represents what is known about a discovered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page has been registered but its fetch has not finished
    Pending,

    /// Page was fetched and parsed
    Loaded(PageDetails),

    /// Page could not be loaded (network error, timeout, bad content)
    LoadError {
        /// Error description
        message: String,
    },
}

impl PageOutcome {
    /// Returns true while the fetch has not finished
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true once the outcome is final
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Returns the page details if the page loaded
    pub fn details(&self) -> Option<&PageDetails> {
        match self {
            Self::Loaded(details) => Some(details),
            _ => None,
        }
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Loaded(_) => "loaded",
            Self::LoadError { .. } => "load_error",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadError { message } => write!(f, "load_error: {}", message),
            other => f.write_str(other.label()),
        }
    }
}

/// A canonical URL together with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Canonical URL of the page
    pub url: String,

    /// What the crawl learned about the page
    pub outcome: PageOutcome,
}
