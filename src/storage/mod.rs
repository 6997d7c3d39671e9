//! Storage module for the keyword index
//!
//! This module handles all database operations for the indexer:
//! - SQLite database initialization and drop-and-recreate schema management
//! - Webpage, keyword and occurrence persistence
//! - Batch relevance recomputation
//! - Ranked search over the index

mod schema;
mod sqlite;
mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::path::Path;

/// Opens a storage database, creating the schema if it is missing
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully opened storage
/// * `Err(StorageError)` - Failed to open storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// Represents an indexed page in the database
#[derive(Debug, Clone, PartialEq)]
pub struct WebpageRecord {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub content: String,
}

/// Represents a keyword occurrence on one page
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceRecord {
    pub webpage_id: i64,
    pub keyword_id: i64,
    pub counter: u32,
    pub relevance: f64,
}

/// A page matched by a search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub webpage_id: i64,
    pub url: String,
    pub title: String,
    pub content: String,
    /// Average relevance over the matched keywords
    pub score: f64,
}
