//! Database schema definitions.

use rusqlite::{Connection, Result};

/// The complete SQL schema for the tracker database.
///
/// Two record tables plus an explicit many-to-many join. The join is
/// maintained symmetrically by the store; foreign keys guard integrity
/// but deletion of join rows is always explicit.
pub const SCHEMA_SQL: &str = r"
    -- Tags table
    CREATE TABLE IF NOT EXISTS tags (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL DEFAULT ''
    );
    CREATE INDEX IF NOT EXISTS idx_tags_name ON tags(name);

    -- Issues table
    CREATE TABLE IF NOT EXISTS issues (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        modified_at TEXT NOT NULL,
        completed INTEGER NOT NULL DEFAULT 0,
        priority INTEGER NOT NULL DEFAULT 1,
        CHECK (priority >= 0 AND priority <= 2)
    );
    CREATE INDEX IF NOT EXISTS idx_issues_created_at ON issues(created_at);
    CREATE INDEX IF NOT EXISTS idx_issues_modified_at ON issues(modified_at);
    CREATE INDEX IF NOT EXISTS idx_issues_completed ON issues(completed);
    CREATE INDEX IF NOT EXISTS idx_issues_priority ON issues(priority);

    -- Tag membership (many-to-many join)
    CREATE TABLE IF NOT EXISTS issue_tags (
        issue_id TEXT NOT NULL,
        tag_id TEXT NOT NULL,
        PRIMARY KEY (issue_id, tag_id),
        FOREIGN KEY (issue_id) REFERENCES issues(id),
        FOREIGN KEY (tag_id) REFERENCES tags(id)
    );
    CREATE INDEX IF NOT EXISTS idx_issue_tags_tag_id ON issue_tags(tag_id);
    CREATE INDEX IF NOT EXISTS idx_issue_tags_issue_id ON issue_tags(issue_id);

    -- Metadata (dirty flag, snapshot bookkeeping)
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Apply the schema to the database.
///
/// This uses `execute_batch` to run the entire DDL script.
/// It is idempotent because all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set journal mode to WAL for concurrency
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Enable foreign keys
    conn.pragma_update(None, "foreign_keys", "ON")?;

    Ok(())
}
