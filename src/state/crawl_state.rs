//! Crawl loop state definitions
//!
//! The loop moves `Idle → Selecting → Fetching → Extracting → Indexing →
//! Selecting → … → Drained`. A failed fetch or an untitled page returns to
//! `Selecting` early.
use std::fmt;

/// Where the crawl loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrawlState {
    /// Not started yet
    #[default]
    Idle,

    /// Choosing the next URL from the frontier
    Selecting,

    /// Waiting on the network
    Fetching,

    /// Scanning the fetched markup
    Extracting,

    /// Writing the page and its keywords
    Indexing,

    /// Terminal: the loop has stopped
    Drained,
}

impl CrawlState {
    /// Returns true once the loop has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Drained)
    }

    /// Returns true while a URL is being worked on
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Fetching | Self::Extracting | Self::Indexing)
    }

    /// Short lowercase name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Selecting => "selecting",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Indexing => "indexing",
            Self::Drained => "drained",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// The frontier ran out of URLs
    #[default]
    Drained,

    /// The operator asked the crawl to stop
    StopRequested,

    /// The configured page limit was reached
    PageLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Drained => "frontier exhausted",
            Self::StopRequested => "stop requested",
            Self::PageLimit => "page limit reached",
        };
        write!(f, "{}", reason)
    }
}
