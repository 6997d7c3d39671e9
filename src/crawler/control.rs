//! Shared stop flag and progress counters
//!
//! The crawl worker is the only writer. Any other task may read a snapshot
//! or request a stop; the worker notices the request at the top of its next
//! iteration and finishes the page it is on first.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Point-in-time copy of the published progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub urls_processed: u64,
    pub pages_indexed: u64,
    pub keywords: u64,
    /// URL being processed, if any
    pub current_url: Option<String>,
}

/// Cross-task control surface for a running crawl
#[derive(Debug, Default)]
pub struct CrawlControl {
    stop: AtomicBool,
    urls_processed: AtomicU64,
    pages_indexed: AtomicU64,
    keywords: AtomicU64,
    current_url: Mutex<Option<String>>,
}

impl CrawlControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the worker to stop before selecting its next URL
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Returns true once a stop has been requested
    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Publishes the URL being processed
    pub fn set_current_url(&self, url: Option<&str>) {
        let mut current = self
            .current_url
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *current = url.map(str::to_string);
    }

    /// Publishes the running counters
    pub fn record_progress(&self, urls_processed: u64, pages_indexed: u64, keywords: u64) {
        self.urls_processed.store(urls_processed, Ordering::Relaxed);
        self.pages_indexed.store(pages_indexed, Ordering::Relaxed);
        self.keywords.store(keywords, Ordering::Relaxed);
    }

    /// Reads the published progress
    pub fn snapshot(&self) -> ProgressSnapshot {
        let current_url = self
            .current_url
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        ProgressSnapshot {
            urls_processed: self.urls_processed.load(Ordering::Relaxed),
            pages_indexed: self.pages_indexed.load(Ordering::Relaxed),
            keywords: self.keywords.load(Ordering::Relaxed),
            current_url,
        }
    }
}
