//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: Where the crawl loop is in its per-URL cycle
//! - `PageOutcome`: What happened to a single selected URL
//! - `CrawlReport`: Totals for a finished run and why it stopped

mod crawl_state;
mod page_outcome;
mod report;

// Re-export main types
pub use crawl_state::{CrawlState, StopReason};
pub use page_outcome::PageOutcome;
pub use report::CrawlReport;
