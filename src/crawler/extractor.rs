//! Article page extraction
//!
//! Title and date are required: without them the page is not a usable
//! article and extraction fails. Body and image are best-effort and simply
//! come back empty when the page lacks them.

use crate::article::Article;
use crate::config::SiteSelectors;
use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use thiserror::Error;

/// A required field could not be extracted
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Missing or empty title element")]
    MissingTitle,

    #[error("Missing date element")]
    MissingDate,

    #[error("Unparsable date '{raw}': {source}")]
    InvalidDate {
        raw: String,
        source: chrono::ParseError,
    },
}

impl ExtractionError {
    /// Name of the field that failed
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingTitle => "title",
            Self::MissingDate | Self::InvalidDate { .. } => "date",
        }
    }
}

/// Fields extracted from one article page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: String,
    pub published_at: NaiveDate,

    /// Non-empty paragraph texts joined with `\n`
    pub body: String,

    /// Raw `src` of the first embedded image, not yet resolved or downloaded
    pub image_url: Option<String>,
}

impl ExtractedArticle {
    /// Turns the extracted fields into a persistable article
    pub fn into_article(self, url: String, image_path: Option<String>) -> Article {
        Article {
            url,
            title: self.title,
            published_at: self.published_at,
            body: self.body,
            image_path,
        }
    }
}

/// Extracts the structured fields of an article page
///
/// # Steps
///
/// 1. Title: first element matching the title selector, whitespace collapsed
/// 2. Date: first element matching the date selector, parsed with the
///    configured format (`March 05, 2024` by default)
/// 3. Body: every paragraph matching the body selector, trimmed and joined
///    with newlines; an empty paragraph leaves an empty line
/// 4. Image: `src` of the first element matching the image selector, if any
///
/// # Returns
///
/// * `Ok(ExtractedArticle)` - Title and date were found
/// * `Err(ExtractionError)` - Title missing, date missing or unparsable
pub fn extract_article(
    html: &str,
    selectors: &SiteSelectors,
) -> Result<ExtractedArticle, ExtractionError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selectors.title)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .ok_or(ExtractionError::MissingTitle)?;

    let raw_date = document
        .select(&selectors.date)
        .next()
        .map(element_text)
        .ok_or(ExtractionError::MissingDate)?;

    let published_at = NaiveDate::parse_from_str(&raw_date, &selectors.date_format)
        .map_err(|source| ExtractionError::InvalidDate {
            raw: raw_date.clone(),
            source,
        })?;

    let body = document
        .select(&selectors.body)
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n");

    let image_url = document
        .select(&selectors.image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string);

    Ok(ExtractedArticle {
        title,
        published_at,
        body,
        image_url,
    })
}

/// Text content of an element with runs of whitespace collapsed to one space
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Paragraph text trimmed at the ends, inner whitespace kept as-is
fn paragraph_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
