use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for WebIndex
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub relevance: RelevanceConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the frontier is seeded with
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Stop after this many URLs have been processed (0 = no limit)
    #[serde(rename = "max-pages", default)]
    pub max_pages: u64,

    /// Discovered links whose absolute form reaches this length are dropped
    #[serde(rename = "max-url-length", default = "default_max_url_length")]
    pub max_url_length: usize,

    /// Per-request timeout in seconds (0 = no timeout)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Log a progress line every N processed URLs
    #[serde(rename = "progress-interval", default = "default_progress_interval")]
    pub progress_interval: u64,
}

impl CrawlerConfig {
    /// Returns the fetch timeout, or None when fetches may block indefinitely
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_secs > 0).then(|| Duration::from_secs(self.fetch_timeout_secs))
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Index database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Pause between disconnecting and reconnecting after a failed statement
    #[serde(rename = "reconnect-backoff-ms", default = "default_reconnect_backoff")]
    pub reconnect_backoff_ms: u64,

    /// Reconnect attempts before giving up (0 = retry forever)
    #[serde(rename = "max-reconnect-attempts", default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

/// Relevance batch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceConfig {
    /// Recompute relevance every N indexed pages
    #[serde(rename = "batch-interval", default = "default_batch_interval")]
    pub batch_interval: u64,

    /// Recompute the remaining touched keywords when the crawl stops
    #[serde(rename = "flush-on-drain", default = "default_flush_on_drain")]
    pub flush_on_drain: bool,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            batch_interval: default_batch_interval(),
            flush_on_drain: default_flush_on_drain(),
        }
    }
}

fn default_max_url_length() -> usize {
    256
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_progress_interval() -> u64 {
    10
}

fn default_reconnect_backoff() -> u64 {
    30_000
}

fn default_max_reconnect_attempts() -> u32 {
    10
}

fn default_batch_interval() -> u64 {
    1000
}

fn default_flush_on_drain() -> bool {
    true
}
