//! Storage traits and error types
//!
//! This module defines the trait interface for index backends and the
//! associated error types.

use crate::storage::{OccurrenceRecord, SearchHit, WebpageRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not connected to the database")]
    Disconnected,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl StorageError {
    /// Returns true if the statement was rejected by a uniqueness or key constraint
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for index backend implementations
///
/// Every statement is synchronous and reports failure through
/// [`StorageError`]. Backends do not retry; reconnection is driven from the
/// outside through [`Storage::disconnect`] and [`Storage::reconnect`].
pub trait Storage {
    // ===== Connection Lifecycle =====

    /// Drops and recreates all index tables, leaving an empty index
    fn reset_schema(&mut self) -> StorageResult<()>;

    /// Closes the underlying connection
    ///
    /// Closing an already closed connection is a no-op.
    fn disconnect(&mut self);

    /// Opens a fresh connection to the same database
    fn reconnect(&mut self) -> StorageResult<()>;

    // ===== Writes =====

    /// Inserts a webpage row
    ///
    /// # Returns
    ///
    /// The id assigned to the new row
    fn insert_webpage(&mut self, url: &str, title: &str, content: &str) -> StorageResult<i64>;

    /// Inserts a keyword row
    ///
    /// # Returns
    ///
    /// The id assigned to the new row, or `ConstraintViolation` if the name exists
    fn insert_keyword(&mut self, name: &str) -> StorageResult<i64>;

    /// Inserts an occurrence row
    ///
    /// Fails with `ConstraintViolation` when the `(webpage_id, keyword_id)`
    /// pair already exists.
    fn insert_occurrence(
        &mut self,
        webpage_id: i64,
        keyword_id: i64,
        counter: u32,
        relevance: f64,
    ) -> StorageResult<()>;

    /// Increments the counter of an existing occurrence
    fn increment_occurrence(&mut self, webpage_id: i64, keyword_id: i64) -> StorageResult<()>;

    /// Recomputes the relevance of every occurrence of the named keyword
    ///
    /// An unknown keyword is a no-op.
    fn recompute_relevance(&mut self, keyword: &str) -> StorageResult<()>;

    // ===== Reads =====

    /// Counts stored webpages
    fn count_webpages(&self) -> StorageResult<u64>;

    /// Counts stored keywords
    fn count_keywords(&self) -> StorageResult<u64>;

    /// Counts stored occurrences
    fn count_occurrences(&self) -> StorageResult<u64>;

    /// Gets a webpage by id
    fn get_webpage(&self, id: i64) -> StorageResult<Option<WebpageRecord>>;

    /// Looks up the id of a keyword by name
    fn find_keyword(&self, name: &str) -> StorageResult<Option<i64>>;

    /// Gets the occurrence row for a page/keyword pair
    fn get_occurrence(
        &self,
        webpage_id: i64,
        keyword_id: i64,
    ) -> StorageResult<Option<OccurrenceRecord>>;

    /// Finds pages containing every term, best average relevance first
    ///
    /// # Arguments
    ///
    /// * `terms` - Lowercase keywords; all must occur on a page for it to match
    /// * `limit` - Maximum number of hits returned
    fn search(&self, terms: &[String], limit: usize) -> StorageResult<Vec<SearchHit>>;
}
