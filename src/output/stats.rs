//! Statistics generation from the index database
//!
//! This module provides functionality for extracting and displaying
//! index statistics from the storage layer.

use crate::storage::{Storage, StorageResult};
use std::fmt::Write;

/// Index statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStatistics {
    /// Number of indexed pages
    pub webpages: u64,

    /// Number of distinct keywords
    pub keywords: u64,

    /// Number of page/keyword pairs
    pub occurrences: u64,
}

impl IndexStatistics {
    /// Average number of distinct keywords per page
    pub fn keywords_per_page(&self) -> f64 {
        if self.webpages > 0 {
            self.occurrences as f64 / self.webpages as f64
        } else {
            0.0
        }
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(IndexStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<IndexStatistics> {
    Ok(IndexStatistics {
        webpages: storage.count_webpages()?,
        keywords: storage.count_keywords()?,
        occurrences: storage.count_occurrences()?,
    })
}

/// Formats statistics for the terminal
pub fn format_statistics(stats: &IndexStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Index Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Pages indexed: {}", stats.webpages);
    let _ = writeln!(out, "  Distinct keywords: {}", stats.keywords);
    let _ = writeln!(out, "  Keyword occurrences: {}", stats.occurrences);
    let _ = writeln!(
        out,
        "  Keywords per page: {:.1}",
        stats.keywords_per_page()
    );
    out
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &IndexStatistics) {
    print!("{}", format_statistics(stats));
}
