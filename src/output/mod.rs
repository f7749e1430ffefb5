//! Output module for the request surface
//!
//! This module handles:
//! - JSON response shapes for crawl and fetch requests
//! - Store statistics

mod json;
pub mod stats;

pub use json::{ErrorResponse, ScrapeResponse};
pub use stats::{load_statistics, StoreStatistics};

use serde::Serialize;

/// Renders a response as pretty-printed JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
