//! Statistics from the article store

use crate::storage::ArticleStore;
use serde::Serialize;

/// Store statistics summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatistics {
    /// Total number of stored articles
    pub articles: u64,

    /// Articles with a downloaded lead image
    pub with_images: u64,
}

/// Loads statistics from storage
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully loaded statistics
/// * `Err(PressError)` - Failed to query statistics
pub fn load_statistics(store: &dyn ArticleStore) -> crate::Result<StoreStatistics> {
    Ok(StoreStatistics {
        articles: store.count_articles()?,
        with_images: store.count_articles_with_images()?,
    })
}
