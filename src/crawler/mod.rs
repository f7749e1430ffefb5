//! Crawler module for category and article processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a fixed identity header
//! - Article link discovery on listing pages
//! - Structured field extraction from article pages
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod links;

pub use coordinator::{ArticleOutcome, Coordinator, CrawlReport, SkippedArticle};
pub use extractor::{extract_article, ExtractedArticle, ExtractionError};
pub use fetcher::{build_http_client, fetch_bytes, fetch_html, get_checked, FetchError};
pub use links::discover_links;

use crate::config::Config;

/// Runs a complete crawl of one category
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the article store
/// 2. Build the HTTP client
/// 3. Fetch the listing page and discover article links
/// 4. Fetch, extract and persist every article not yet stored
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `category_url` - The category listing page to crawl
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl ran; the report may be empty if the listing page failed
/// * `Err(PressError)` - The store or HTTP client could not be set up
pub async fn crawl(config: &Config, category_url: &str) -> crate::Result<CrawlReport> {
    let coordinator = Coordinator::from_config(config)?;
    Ok(coordinator.crawl_category(category_url).await)
}
