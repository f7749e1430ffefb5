//! Sumi-Press: a news category crawler
//!
//! This crate crawls a news category listing page, discovers article links,
//! extracts each article's title, date, body and lead image, and persists
//! articles it has not seen before.

pub mod article;
pub mod config;
pub mod crawler;
pub mod images;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Press operations
#[derive(Debug, Error)]
pub enum PressError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] crawler::ExtractionError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid CSS selector for {field}: {message}")]
    InvalidSelector { field: &'static str, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("URL has no file name: {0}")]
    MissingFileName(String),
}

/// Result type alias for Sumi-Press operations
pub type Result<T> = std::result::Result<T, PressError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use article::{Article, ArticleView};
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport};
pub use url::normalize_url;
