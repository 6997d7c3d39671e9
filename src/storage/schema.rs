//! Database schema definitions
//!
//! This module contains the SQL schema for the webindex database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Indexed pages
CREATE TABLE IF NOT EXISTS webpage (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_webpage_url ON webpage(url);

-- Distinct lowercase tokens
CREATE TABLE IF NOT EXISTS keyword (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_keyword_name ON keyword(name);

-- Per-page keyword counts
CREATE TABLE IF NOT EXISTS occurrence (
    webpage_id INTEGER NOT NULL REFERENCES webpage(id),
    keyword_id INTEGER NOT NULL REFERENCES keyword(id),
    counter INTEGER NOT NULL DEFAULT 1,
    relevance REAL NOT NULL DEFAULT 0,
    PRIMARY KEY (webpage_id, keyword_id)
);

CREATE INDEX IF NOT EXISTS idx_occurrence_keyword ON occurrence(keyword_id);
"#;

/// Drops every index table, children first
pub const DROP_SQL: &str = r#"
DROP TABLE IF EXISTS occurrence;
DROP TABLE IF EXISTS keyword;
DROP TABLE IF EXISTS webpage;
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Drops and recreates the schema, discarding any previous index
pub fn reset_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(DROP_SQL)?;
    initialize_schema(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn table_count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["webpage", "keyword", "occurrence"] {
            assert_eq!(table_count(&conn, table), 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_reset_discards_rows() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO webpage (url, title, content) VALUES ('u', 't', 'c')",
            [],
        )
        .unwrap();

        reset_schema(&conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM webpage", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_webpage_url_unique() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO webpage (url, title, content) VALUES ('https://a/', 't', 'c')",
            [],
        )
        .unwrap();
        assert!(conn
            .execute(
                "INSERT INTO webpage (url, title, content) VALUES ('https://a/', 'u', 'd')",
                [],
            )
            .is_err());
    }

    #[test]
    fn test_keyword_name_unique() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute("INSERT INTO keyword (name) VALUES ('rust')", [])
            .unwrap();
        assert!(conn
            .execute("INSERT INTO keyword (name) VALUES ('rust')", [])
            .is_err());
    }
}
