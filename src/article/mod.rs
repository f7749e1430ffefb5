//! Article data model
//!
//! [`Article`] is the unit of persistence. [`ArticleView`] is the projection
//! returned to callers of the fetch-by-URL read path.

mod view;

pub use view::ArticleView;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A scraped news article
///
/// Created once when the article is first extracted and persisted; the
/// pipeline never updates or deletes it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Canonical source URL, unique across the store
    pub url: String,

    pub title: String,

    /// Publication date at calendar-day granularity
    pub published_at: NaiveDate,

    /// Paragraph text joined with newlines; empty when the page has no body paragraphs
    pub body: String,

    /// Local path of the downloaded lead image
    pub image_path: Option<String>,
}

/// Parses a stored date into a calendar date
///
/// Accepts plain `YYYY-MM-DD` as well as ISO timestamps such as
/// `2024-03-05T00:00:00`; any time-of-day component is dropped.
pub fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
