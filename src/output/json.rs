//! JSON response shapes for the request surface

use crate::crawler::{CrawlReport, SkippedArticle};
use serde::Serialize;

/// Response to a crawl request
///
/// A crawl always succeeds from the caller's point of view; per-article
/// failures appear only in `skipped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeResponse {
    pub message: String,
    pub scraped_count: usize,
    pub scraped_urls: Vec<String>,
    pub skipped: Vec<SkippedArticle>,
}

impl From<CrawlReport> for ScrapeResponse {
    fn from(report: CrawlReport) -> Self {
        Self {
            message: format!("Scraped {} new articles.", report.scraped_count()),
            scraped_count: report.scraped_count(),
            scraped_urls: report.scraped_urls,
            skipped: report.skipped,
        }
    }
}

/// Error body for rejected requests and failed lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
