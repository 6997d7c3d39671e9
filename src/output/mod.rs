//! Output module for crawl summaries, index statistics and search results
//!
//! This module handles:
//! - Printing the summary of a finished crawl
//! - Reading and printing index statistics
//! - Running keyword searches and rendering the hits

mod report;
pub mod search;
pub mod stats;

pub use report::{format_report, print_report};
pub use search::{print_search_results, search, DEFAULT_SEARCH_LIMIT};
pub use stats::{load_statistics, print_statistics, IndexStatistics};
