//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ArticleStore trait.

use crate::article::{parse_stored_date, Article};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ArticleStore, StorageError, StorageResult};
use crate::PressError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
    table: String,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `table` - Name of the article table, already validated as an identifier
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(PressError)` - Failed to open database
    pub fn new(path: &Path, table: &str) -> Result<Self, PressError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(StorageError::from)?;

        // Several crawler processes may share the file
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(StorageError::from)?;

        initialize_schema(&conn, table).map_err(StorageError::from)?;

        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory(table: &str) -> Result<Self, PressError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        initialize_schema(&conn, table).map_err(StorageError::from)?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }
}

impl ArticleStore for SqliteStorage {
    fn exists(&self, url: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE url = ?1 LIMIT 1", self.table),
                params![url],
                |row| row.get(0),
            )
            .optional()?;

        let exists = found.is_some();
        tracing::debug!("Checked existence for article: {} - Exists: {}", url, exists);
        Ok(exists)
    }

    fn save(&mut self, article: &Article) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {} (url, title, published_at, body, image_path, scraped_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                self.table
            ),
            params![
                article.url,
                article.title,
                article.published_at.format("%Y-%m-%d").to_string(),
                article.body,
                article.image_path,
                now
            ],
        )?;

        if inserted == 1 {
            tracing::info!("Article saved: {}", article.url);
            Ok(true)
        } else {
            tracing::info!("Article already exists, not saved: {}", article.url);
            Ok(false)
        }
    }

    fn get_by_url(&self, url: &str) -> StorageResult<Article> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT url, title, published_at, body, image_path FROM {} WHERE url = ?1",
                    self.table
                ),
                params![url],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((url, title, published_at, body, image_path)) = row else {
            tracing::warn!("Article not found in DB: {}", url);
            return Err(StorageError::ArticleNotFound(url.to_string()));
        };

        let published_at =
            parse_stored_date(&published_at).ok_or_else(|| StorageError::InvalidRecord {
                url: url.clone(),
                message: format!("unparsable date '{}'", published_at),
            })?;

        tracing::info!("Article retrieved from DB: {}", url);

        Ok(Article {
            url,
            title,
            published_at,
            body,
            image_path,
        })
    }

    fn count_articles(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_articles_with_images(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE image_path IS NOT NULL",
                self.table
            ),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
