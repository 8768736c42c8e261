//! Storage layout of the keyword index
//!
//! One SQLite database per index directory, holding a single FTS5 table.
//! `url` is stored but never tokenized, so it only matches by equality.
//! `content` is tokenized case-insensitively for ranked full-text search.

use rusqlite::Connection;

/// Database file name inside an index directory
pub const DATABASE_FILE: &str = "index.sqlite3";

/// Name of the document table
pub const TABLE: &str = "documents";

/// Create the document table when it does not exist yet
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE VIRTUAL TABLE IF NOT EXISTS documents USING fts5(
            url UNINDEXED,
            content,
            tokenize = 'unicode61'
        );",
    )
}

/// Whether the document table is present
pub fn is_initialized(conn: &Connection) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [TABLE],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
