//! URL handling module for Sumi-Press
//!
//! This module provides canonical URL normalization and file name extraction.

mod normalize;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use normalize::normalize_url;

/// Extracts the final path segment of a URL to use as a file name
///
/// Query strings and fragments are ignored. Segments that would escape the
/// target directory (`.` and `..`) or are empty are rejected.
///
/// # Examples
///
/// ```
/// use sumi_press::url::file_name;
/// use url::Url;
///
/// let url = Url::parse("https://cdn.geo.tv/assets/uploads/pic.jpg?w=600").unwrap();
/// assert_eq!(file_name(&url).unwrap(), "pic.jpg");
/// ```
pub fn file_name(url: &Url) -> UrlResult<String> {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    match segment {
        "" | "." | ".." => Err(UrlError::MissingFileName(url.to_string())),
        name => Ok(name.to_string()),
    }
}
