//! WebIndex: a single-worker web crawler and keyword indexer
//!
//! This crate crawls a web graph from a seed URL, converts every fetched page to
//! plain text, and builds a relational index of pages, keywords and per-page
//! keyword occurrences. Keyword relevance is recomputed in batches as the crawl
//! progresses.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod index;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for WebIndex operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error(
        "Storage unavailable during {operation}: {source}; {attempts} reconnect attempts failed, last with: {reconnect}"
    )]
    StorageUnavailable {
        operation: &'static str,
        attempts: u32,
        /// The statement failure that started the recovery
        source: storage::StorageError,
        /// The failure of the final reconnect attempt
        reconnect: storage::StorageError,
    },

    #[error("Cannot {operation}: {source}")]
    PermanentStorage {
        operation: &'static str,
        source: storage::StorageError,
    },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrawlError {
    /// Returns true if this error means the storage layer gave up
    ///
    /// These are the failures that stop the crawl loop and must be shown to
    /// the operator.
    pub fn is_fatal_storage(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable { .. } | Self::PermanentStorage { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("URL exceeds {max} characters")]
    TooLong { max: usize },

    #[error("URL points to a .{0} file")]
    SkippedExtension(String),
}

/// Result type alias for WebIndex operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlControl, Frontier};
pub use extract::{extract_page, ExtractedPage, HtmlToText};
pub use index::{tokenize, Indexer};
pub use state::{CrawlState, PageOutcome};
pub use url::{normalize_url, resolve_link};
