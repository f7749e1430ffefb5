//! Pre-compiled CSS selectors for the target site's HTML layout

use crate::config::types::SiteConfig;
use crate::{ConfigError, ConfigResult};
use scraper::Selector;

/// The site's selectors, parsed once and shared by the link discoverer and
/// the article extractor
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    pub link: Selector,
    pub title: Selector,
    pub date: Selector,
    pub body: Selector,
    pub image: Selector,

    /// Path segment an article URL must contain
    pub article_path_segment: String,

    /// chrono format for the date element's text
    pub date_format: String,
}

impl SiteSelectors {
    /// Compiles every selector in the site configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SiteSelectors)` - All selectors parsed
    /// * `Err(ConfigError::InvalidSelector)` - The first selector that failed to parse
    pub fn compile(site: &SiteConfig) -> ConfigResult<Self> {
        Ok(Self {
            link: parse_selector("link-selector", &site.link_selector)?,
            title: parse_selector("title-selector", &site.title_selector)?,
            date: parse_selector("date-selector", &site.date_selector)?,
            body: parse_selector("body-selector", &site.body_selector)?,
            image: parse_selector("image-selector", &site.image_selector)?,
            article_path_segment: site.article_path_segment.clone(),
            date_format: site.date_format.clone(),
        })
    }
}

fn parse_selector(field: &'static str, css: &str) -> ConfigResult<Selector> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        field,
        message: format!("'{}': {:?}", css, e),
    })
}
