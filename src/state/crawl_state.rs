use std::fmt;

/// Lifecycle of a crawl engine
///
/// `NotStarted -> Running -> {Completed, Canceled}`; the last two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// `start` has not been called
    NotStarted,

    /// Workers may still be fetching pages
    Running,

    /// Every reachable in-origin page has been processed
    Completed,

    /// The crawl was stopped before quiescence
    Canceled,
}

impl CrawlState {
    /// Returns true for `Completed` and `Canceled`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
