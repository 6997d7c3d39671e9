//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The URL frontier with inbound-link scoring
//! - HTTP fetching
//! - The shared stop flag and progress counters
//! - Overall crawl coordination

mod control;
mod coordinator;
mod fetcher;
mod frontier;

pub use control::{CrawlControl, ProgressSnapshot};
pub use coordinator::Coordinator;
pub use fetcher::{
    build_http_client, fetch_url, is_html_content_type, user_agent_string, FetchResult, Fetcher,
    HttpFetcher,
};
pub use frontier::{Frontier, OfferOutcome};
