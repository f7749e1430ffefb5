//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one category crawl end to end:
//! - Fetching the listing page and discovering article links
//! - Skipping articles already in the store
//! - Fetching, extracting and persisting each new article
//! - Downloading lead images
//!
//! Articles are processed one at a time. Each article's pipeline returns its
//! own result, so a bad page, a broken image or a transient network error
//! only costs that one article.

use crate::article::Article;
use crate::config::{Config, SiteSelectors};
use crate::crawler::extractor::extract_article;
use crate::crawler::fetcher::{build_http_client, fetch_html};
use crate::crawler::links::discover_links;
use crate::images::ImageStore;
use crate::storage::{open_storage, ArticleStore, SqliteStorage, StorageError, StorageResult};
use crate::url::normalize_url;
use crate::PressError;
use reqwest::Client;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use url::Url;

/// Outcome of one category crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// Canonical form of the category URL that was crawled
    pub category_url: String,

    /// Number of distinct article links found on the listing page
    pub discovered: usize,

    /// Links skipped because the article was already stored
    pub already_known: usize,

    /// Articles newly persisted by this crawl, in processing order
    pub scraped_urls: Vec<String>,

    /// Articles that failed, with the reason
    pub skipped: Vec<SkippedArticle>,
}

impl CrawlReport {
    fn empty(category_url: &str) -> Self {
        Self {
            category_url: category_url.to_string(),
            ..Self::default()
        }
    }

    /// Number of newly persisted articles
    pub fn scraped_count(&self) -> usize {
        self.scraped_urls.len()
    }
}

/// An article the crawl could not process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedArticle {
    pub url: String,
    pub reason: String,
}

/// Result of running the pipeline for one article URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    /// The article was new and this crawl stored it
    Saved(Article),

    /// The store already held an article with this URL
    AlreadyKnown,
}

/// Main crawler coordinator structure
pub struct Coordinator<S: ArticleStore> {
    client: Client,
    images: ImageStore,
    selectors: SiteSelectors,
    store: Arc<Mutex<S>>,
}

impl Coordinator<SqliteStorage> {
    /// Creates a coordinator backed by the SQLite store named in `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(PressError)` - Failed to open the store or build the HTTP client
    pub fn from_config(config: &Config) -> Result<Self, PressError> {
        let storage = open_storage(&config.storage)?;
        Self::new(config, storage)
    }
}

impl<S: ArticleStore> Coordinator<S> {
    /// Creates a coordinator over an existing store
    pub fn new(config: &Config, store: S) -> Result<Self, PressError> {
        Self::with_shared_store(config, Arc::new(Mutex::new(store)))
    }

    /// Creates a coordinator over a store shared with other coordinators
    pub fn with_shared_store(config: &Config, store: Arc<Mutex<S>>) -> Result<Self, PressError> {
        let client = build_http_client(&config.http)?;
        let images = ImageStore::new(client.clone(), &config.images);
        let selectors = SiteSelectors::compile(&config.site)?;

        Ok(Self {
            client,
            images,
            selectors,
            store,
        })
    }

    /// Handle to the underlying store
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// Crawls a category and returns the newly scraped articles
    ///
    /// Never fails: a category-level failure (bad URL, listing page not
    /// fetchable) is logged and yields an empty report.
    pub async fn crawl_category(&self, category_url: &str) -> CrawlReport {
        match self.try_crawl_category(category_url).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!("Error during category scraping of {}: {}", category_url, e);
                CrawlReport::empty(category_url)
            }
        }
    }

    /// Crawls a category, surfacing category-level failures
    ///
    /// # Flow
    ///
    /// 1. Normalize the category URL and fetch the listing page
    /// 2. Discover article links on it
    /// 3. Run [`Coordinator::process_article`] for each link in turn
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The listing page was processed; per-article
    ///   failures are recorded in `skipped`
    /// * `Err(PressError)` - The listing page could not be fetched
    pub async fn try_crawl_category(&self, category_url: &str) -> Result<CrawlReport, PressError> {
        let base_url = normalize_url(category_url)?;
        tracing::info!("Scraping category: {}", base_url);

        let html = fetch_html(&self.client, base_url.as_str()).await?;
        let links = discover_links(&html, &base_url, &self.selectors);

        let mut report = CrawlReport::empty(base_url.as_str());
        report.discovered = links.len();

        for url in links {
            match self.process_article(&url).await {
                Ok(ArticleOutcome::Saved(_)) => report.scraped_urls.push(url),
                Ok(ArticleOutcome::AlreadyKnown) => report.already_known += 1,
                Err(e) => {
                    tracing::warn!("Failed to scrape article: {} - {}", url, e);
                    report.skipped.push(SkippedArticle {
                        url,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Scraped {} new articles from {} ({} already known, {} skipped)",
            report.scraped_count(),
            report.category_url,
            report.already_known,
            report.skipped.len()
        );

        Ok(report)
    }

    /// Runs the fetch, extract, download and persist pipeline for one article
    ///
    /// Image download failures are logged and leave `image_path` unset; they
    /// never fail the article.
    ///
    /// # Returns
    ///
    /// * `Ok(ArticleOutcome::Saved)` - The article was stored by this call
    /// * `Ok(ArticleOutcome::AlreadyKnown)` - Already stored, before or during this call
    /// * `Err(PressError)` - Fetch, extraction or storage failure for this article
    pub async fn process_article(&self, url: &str) -> Result<ArticleOutcome, PressError> {
        if self.with_store(|store| store.exists(url))? {
            tracing::debug!("Article already exists: {}", url);
            return Ok(ArticleOutcome::AlreadyKnown);
        }

        let html = fetch_html(&self.client, url).await?;
        let extracted = extract_article(&html, &self.selectors)?;

        let image_path = match extracted.image_url.as_deref() {
            Some(src) => self.download_image(url, src).await,
            None => None,
        };

        let article = extracted.into_article(url.to_string(), image_path);

        // A concurrent crawler may have stored it since the existence check
        if self.with_store(|store| store.save(&article))? {
            tracing::info!("Scraped and saved article: {}", url);
            Ok(ArticleOutcome::Saved(article))
        } else {
            Ok(ArticleOutcome::AlreadyKnown)
        }
    }

    /// Downloads an article's lead image, returning its local path on success
    async fn download_image(&self, article_url: &str, src: &str) -> Option<String> {
        let image_url = match resolve_image_url(article_url, src) {
            Some(image_url) => image_url,
            None => {
                tracing::warn!("Unusable image source '{}' on {}", src, article_url);
                return None;
            }
        };

        match self.images.download(image_url.as_str()).await {
            Ok(path) => Some(path.to_string_lossy().into_owned()),
            Err(e) => {
                tracing::warn!("Failed to download image: {} - {}", image_url, e);
                None
            }
        }
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut S) -> StorageResult<T>) -> StorageResult<T> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| StorageError::Database("article store lock poisoned".to_string()))?;
        f(&mut *store)
    }
}

/// Resolves an image `src` against the page it appeared on
fn resolve_image_url(article_url: &str, src: &str) -> Option<Url> {
    let base = Url::parse(article_url).ok()?;
    let resolved = base.join(src).ok()?;
    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}
