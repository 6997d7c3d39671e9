use crate::state::{PageOutcome, StopReason};
use std::time::Duration;

/// Summary of a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// URLs taken from the frontier
    pub urls_processed: u64,
    /// Pages written to storage
    pub pages_indexed: u64,
    /// URLs abandoned because the fetch failed
    pub fetch_failures: u64,
    /// Pages skipped for lack of a title
    pub untitled_pages: u64,
    /// Distinct keywords recorded
    pub keywords: u64,
    /// Relevance batches run, including the final flush
    pub relevance_batches: u64,
    /// URLs still pending when the loop stopped
    pub pending_urls: u64,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Counts one processed URL
    pub fn record(&mut self, outcome: PageOutcome) {
        self.urls_processed += 1;
        match outcome {
            PageOutcome::Indexed { .. } => self.pages_indexed += 1,
            PageOutcome::FetchFailed => self.fetch_failures += 1,
            PageOutcome::Untitled => self.untitled_pages += 1,
        }
    }

    /// Indexed pages per second over the whole run
    pub fn pages_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_indexed as f64 / secs
        } else {
            0.0
        }
    }
}
