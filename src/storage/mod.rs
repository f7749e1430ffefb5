//! Storage module for persisting articles
//!
//! This module is the dedup and persistence gateway of the crawler:
//! - SQLite database initialization and schema management
//! - Existence checks keyed by canonical URL
//! - Atomic insert-if-absent
//! - Point lookup for the fetch-by-URL read path

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{ArticleStore, StorageError, StorageResult};

use crate::article::Article;
use crate::config::StorageConfig;
use crate::url::normalize_url;
use crate::PressError;

use std::path::Path;

/// Opens (creating if needed) the article store described by `config`
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(PressError)` - Failed to initialize storage
pub fn open_storage(config: &StorageConfig) -> Result<SqliteStorage, PressError> {
    tracing::info!("Opening article store at {}", config.database_path);
    SqliteStorage::new(Path::new(&config.database_path), &config.table_name)
}

/// Looks up an article by a caller-supplied URL
///
/// The URL is normalized the same way discovered links are, so a lookup with
/// the address as published finds the stored article.
///
/// # Returns
///
/// * `Ok(Article)` - The stored article
/// * `Err(PressError::UrlError)` - The input is not an absolute http(s) URL
/// * `Err(PressError::Storage(StorageError::ArticleNotFound))` - Nothing stored under that URL
pub fn lookup_article(store: &dyn ArticleStore, url: &str) -> Result<Article, PressError> {
    let canonical = normalize_url(url)?;
    Ok(store.get_by_url(canonical.as_str())?)
}
