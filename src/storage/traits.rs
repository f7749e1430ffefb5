//! Storage traits and error types
//!
//! This module defines the trait interface for article stores and
//! associated error types.

use crate::article::Article;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("Invalid stored record for {url}: {message}")]
    InvalidRecord { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Dedup and persistence gateway over the article store
///
/// Articles are keyed by their canonical URL. Implementations must enforce
/// URL uniqueness themselves so that `save` stays correct when several
/// crawlers write to the same store.
pub trait ArticleStore {
    /// Returns true iff an article with exactly this URL is stored
    fn exists(&self, url: &str) -> StorageResult<bool>;

    /// Inserts the article unless one with the same URL is already stored
    ///
    /// The check and the insert happen as one atomic operation.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - This call inserted the article
    /// * `Ok(false)` - An article with this URL already existed; nothing changed
    fn save(&mut self, article: &Article) -> StorageResult<bool>;

    /// Looks up a single article by URL
    ///
    /// Returns `StorageError::ArticleNotFound` when no article has this URL.
    fn get_by_url(&self, url: &str) -> StorageResult<Article>;

    /// Gets total article count
    fn count_articles(&self) -> StorageResult<u64>;

    /// Counts articles that have a stored lead image
    fn count_articles_with_images(&self) -> StorageResult<u64>;
}
