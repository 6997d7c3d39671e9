//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::{self, initialize_schema};
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{OccurrenceRecord, SearchHit, WebpageRecord};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension};
use std::path::{Path, PathBuf};

/// SQLite storage backend
///
/// The connection can be dropped and reopened, which is how the retry
/// policy recovers from a broken database handle.
pub struct SqliteStorage {
    /// Database file; `None` for an in-memory database
    path: Option<PathBuf>,
    conn: Option<Connection>,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// Missing tables are created; existing rows are kept.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = open_connection(path)?;
        initialize_schema(&conn)?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Some(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    ///
    /// Disconnecting an in-memory database would lose its contents, so
    /// `disconnect` and `reconnect` leave the connection in place.
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            path: None,
            conn: Some(conn),
        })
    }

    /// Returns the database file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns true while a connection is open
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> StorageResult<&Connection> {
        self.conn.as_ref().ok_or(StorageError::Disconnected)
    }

    fn conn_mut(&mut self) -> StorageResult<&mut Connection> {
        self.conn.as_mut().ok_or(StorageError::Disconnected)
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn()?.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Opens a database file with the pragmas the indexer relies on
fn open_connection(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA temp_store = MEMORY;
    ",
    )?;

    Ok(conn)
}

/// Maps uniqueness and key failures to `ConstraintViolation`
fn classify(err: rusqlite::Error) -> StorageError {
    match err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            StorageError::ConstraintViolation(message.unwrap_or_else(|| failure.to_string()))
        }
        other => StorageError::Sqlite(other),
    }
}

impl Storage for SqliteStorage {
    // ===== Connection Lifecycle =====

    fn reset_schema(&mut self) -> StorageResult<()> {
        schema::reset_schema(self.conn()?)?;
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.path.is_none() {
            return;
        }
        if let Some(conn) = self.conn.take() {
            if let Err((_, e)) = conn.close() {
                tracing::warn!("Error while closing database connection: {}", e);
            }
        }
    }

    fn reconnect(&mut self) -> StorageResult<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let conn = open_connection(path)?;
        self.conn = Some(conn);
        Ok(())
    }

    // ===== Writes =====

    fn insert_webpage(&mut self, url: &str, title: &str, content: &str) -> StorageResult<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO webpage (url, title, content) VALUES (?1, ?2, ?3)",
            params![url, title, content],
        )
        .map_err(classify)?;
        Ok(conn.last_insert_rowid())
    }

    fn insert_keyword(&mut self, name: &str) -> StorageResult<i64> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO keyword (name) VALUES (?1)", params![name])
            .map_err(classify)?;
        Ok(conn.last_insert_rowid())
    }

    fn insert_occurrence(
        &mut self,
        webpage_id: i64,
        keyword_id: i64,
        counter: u32,
        relevance: f64,
    ) -> StorageResult<()> {
        self.conn()?
            .execute(
                "INSERT INTO occurrence (webpage_id, keyword_id, counter, relevance)
                 VALUES (?1, ?2, ?3, ?4)",
                params![webpage_id, keyword_id, counter, relevance],
            )
            .map_err(classify)?;
        Ok(())
    }

    fn increment_occurrence(&mut self, webpage_id: i64, keyword_id: i64) -> StorageResult<()> {
        let updated = self.conn()?.execute(
            "UPDATE occurrence SET counter = counter + 1 WHERE webpage_id = ?1 AND keyword_id = ?2",
            params![webpage_id, keyword_id],
        )?;

        if updated == 0 {
            return Err(StorageError::Database(format!(
                "No occurrence for page {} and keyword {}",
                webpage_id, keyword_id
            )));
        }
        Ok(())
    }

    fn recompute_relevance(&mut self, keyword: &str) -> StorageResult<()> {
        let tx = self.conn_mut()?.transaction()?;

        let keyword_id: Option<i64> = tx
            .query_row(
                "SELECT id FROM keyword WHERE name = ?1",
                params![keyword],
                |row| row.get(0),
            )
            .optional()?;
        let Some(keyword_id) = keyword_id else {
            return Ok(());
        };

        let total_pages: i64 = tx.query_row("SELECT COUNT(*) FROM webpage", [], |row| row.get(0))?;
        let (max_counter, pages_with): (Option<i64>, i64) = tx.query_row(
            "SELECT MAX(counter), COUNT(webpage_id) FROM occurrence WHERE keyword_id = ?1",
            params![keyword_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let max_counter = max_counter.unwrap_or(0);
        if max_counter <= 0 || pages_with == 0 {
            return Ok(());
        }

        // relevance = counter / max_counter * ln((1 + N) / n_k)
        let idf = ((1 + total_pages) as f64 / pages_with as f64).ln();
        let factor = idf / max_counter as f64;

        tx.execute(
            "UPDATE occurrence SET relevance = counter * ?1 WHERE keyword_id = ?2",
            params![factor, keyword_id],
        )?;
        tx.commit()?;

        Ok(())
    }

    // ===== Reads =====

    fn count_webpages(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM webpage")
    }

    fn count_keywords(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM keyword")
    }

    fn count_occurrences(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM occurrence")
    }

    fn get_webpage(&self, id: i64) -> StorageResult<Option<WebpageRecord>> {
        let page = self
            .conn()?
            .query_row(
                "SELECT id, url, title, content FROM webpage WHERE id = ?1",
                params![id],
                |row| {
                    Ok(WebpageRecord {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        title: row.get(2)?,
                        content: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(page)
    }

    fn find_keyword(&self, name: &str) -> StorageResult<Option<i64>> {
        let id = self
            .conn()?
            .query_row(
                "SELECT id FROM keyword WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        Ok(id)
    }

    fn get_occurrence(
        &self,
        webpage_id: i64,
        keyword_id: i64,
    ) -> StorageResult<Option<OccurrenceRecord>> {
        let occurrence = self
            .conn()?
            .query_row(
                "SELECT webpage_id, keyword_id, counter, relevance FROM occurrence
                 WHERE webpage_id = ?1 AND keyword_id = ?2",
                params![webpage_id, keyword_id],
                |row| {
                    Ok(OccurrenceRecord {
                        webpage_id: row.get(0)?,
                        keyword_id: row.get(1)?,
                        counter: row.get(2)?,
                        relevance: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(occurrence)
    }

    fn search(&self, terms: &[String], limit: usize) -> StorageResult<Vec<SearchHit>> {
        let mut unique: Vec<&str> = terms.iter().map(String::as_str).collect();
        unique.sort_unstable();
        unique.dedup();

        if unique.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; unique.len()].join(", ");
        let query = format!(
            "
            SELECT w.id, w.url, w.title, w.content, AVG(o.relevance) AS score
            FROM occurrence o
            JOIN keyword k ON k.id = o.keyword_id
            JOIN webpage w ON w.id = o.webpage_id
            WHERE k.name IN ({})
            GROUP BY w.id
            HAVING COUNT(DISTINCT k.id) = ?
            ORDER BY score DESC, w.id ASC
            LIMIT ?
        ",
            placeholders
        );

        let mut values: Vec<Value> = unique
            .iter()
            .map(|term| Value::Text(term.to_string()))
            .collect();
        values.push(Value::Integer(unique.len() as i64));
        values.push(Value::Integer(limit as i64));

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&query)?;
        let hits = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok(SearchHit {
                    webpage_id: row.get(0)?,
                    url: row.get(1)?,
                    title: row.get(2)?,
                    content: row.get(3)?,
                    score: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hits)
    }
}
