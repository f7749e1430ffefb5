use crate::article::Article;
use serde::Serialize;
use std::path::Path;

/// The caller-facing representation of a stored article
///
/// Never exposes the store's internal identifier or the raw filesystem path
/// of the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleView {
    pub title: String,

    /// `YYYY-MM-DD`
    pub date: String,

    pub text: String,

    /// Image location under the image-serving route, e.g. `/images/pic.jpg`
    pub image_path: Option<String>,
}

impl ArticleView {
    /// Builds the view of `article`, mapping its image onto `image_route`
    pub fn from_article(article: &Article, image_route: &str) -> Self {
        Self {
            title: article.title.clone(),
            date: article.published_at.format("%Y-%m-%d").to_string(),
            text: article.body.clone(),
            image_path: article
                .image_path
                .as_deref()
                .and_then(|path| image_reference(path, image_route)),
        }
    }
}

/// Maps a stored image path to its serving route using only the file's base name
fn image_reference(stored_path: &str, image_route: &str) -> Option<String> {
    let name = Path::new(stored_path).file_name()?.to_str()?;
    Some(format!("{}/{}", image_route.trim_end_matches('/'), name))
}
