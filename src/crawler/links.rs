//! Link discovery on category listing pages
//!
//! Selects the site's "open article" anchors, resolves them against the
//! listing URL, keeps only those under the article path segment and
//! deduplicates the result.

use crate::config::SiteSelectors;
use crate::url::normalize_url;
use scraper::Html;
use std::collections::HashSet;
use url::Url;

/// Discovers article URLs on a listing page
///
/// # Link Rules
///
/// **Include:**
/// - Anchors matching the configured link selector with an `href`
/// - Whose resolved URL path contains the article path segment
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs
/// - Fragment-only hrefs
/// - Anything that does not resolve to an absolute http(s) URL
///
/// # Arguments
///
/// * `html` - The listing page HTML
/// * `base_url` - The listing page URL, used to resolve relative links
/// * `selectors` - The compiled site selectors
///
/// # Returns
///
/// Canonical article URLs in first-seen order without duplicates. A page with
/// no matching links yields an empty list.
///
/// # Example
///
/// ```no_run
/// use sumi_press::config::{SiteConfig, SiteSelectors};
/// use sumi_press::crawler::discover_links;
/// use url::Url;
///
/// let selectors = SiteSelectors::compile(&SiteConfig::default()).unwrap();
/// let html = r#"<a class="open-section" href="/latest/1-story">Story</a>"#;
/// let base = Url::parse("https://www.geo.tv/category/world").unwrap();
/// let links = discover_links(html, &base, &selectors);
/// assert_eq!(links, vec!["https://www.geo.tv/latest/1-story".to_string()]);
/// ```
pub fn discover_links(html: &str, base_url: &Url, selectors: &SiteSelectors) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selectors.link) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(url) = resolve_link(href, base_url) else {
            continue;
        };

        if !url.path().contains(selectors.article_path_segment.as_str()) {
            continue;
        }

        if seen.insert(url.to_string()) {
            links.push(url.to_string());
        }
    }

    tracing::info!("Found {} potential article URLs.", links.len());
    links
}

/// Resolves a link href to a canonical absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid or non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    normalize_url(absolute.as_str()).ok()
}
