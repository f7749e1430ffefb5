//! Database schema definitions
//!
//! The article table name is configurable, so the schema is rendered per table.

/// Renders the SQL schema for an article table
///
/// The `UNIQUE` constraint on `url` is what makes `save` an atomic
/// insert-if-absent.
pub fn schema_sql(table: &str) -> String {
    format!(
        r#"
-- One row per scraped article
CREATE TABLE IF NOT EXISTS {table} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    published_at TEXT NOT NULL,
    body TEXT NOT NULL DEFAULT '',
    image_path TEXT,
    scraped_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_{table}_published_at ON {table}(published_at);
"#
    )
}

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `table` - Name of the article table; must already be validated as an identifier
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection, table: &str) -> Result<(), rusqlite::Error> {
    conn.execute_batch(&schema_sql(table))?;
    Ok(())
}
