use serde::Deserialize;

/// Main configuration structure for Sumi-Press
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub images: ImageConfig,
    pub site: SiteConfig,

    /// Default tracing filter when no verbosity flag is given
    #[serde(rename = "log-level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            storage: StorageConfig::default(),
            images: ImageConfig::default(),
            site: SiteConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Identity sent with every request; some sites reject default client identities
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Article store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Table holding article records
    #[serde(rename = "table-name")]
    pub table_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./articles.db".to_string(),
            table_name: "articles".to_string(),
        }
    }
}

/// Local image storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Directory downloaded images are written to
    pub folder: String,

    /// Route prefix images are served under
    pub route: String,

    /// Write buffer size used while streaming an image to disk
    #[serde(rename = "chunk-size")]
    pub chunk_size: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            folder: "./images".to_string(),
            route: "/images".to_string(),
            chunk_size: 1024,
        }
    }
}

/// Site-specific HTML structure
///
/// Defaults match the Geo News layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Anchors on a listing page that open an article
    #[serde(rename = "link-selector")]
    pub link_selector: String,

    /// Path segment every article URL contains
    #[serde(rename = "article-path-segment")]
    pub article_path_segment: String,

    #[serde(rename = "title-selector")]
    pub title_selector: String,

    #[serde(rename = "date-selector")]
    pub date_selector: String,

    /// chrono format string for the date element's text
    #[serde(rename = "date-format")]
    pub date_format: String,

    #[serde(rename = "body-selector")]
    pub body_selector: String,

    #[serde(rename = "image-selector")]
    pub image_selector: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            link_selector: "a.open-section".to_string(),
            article_path_segment: "/latest/".to_string(),
            title_selector: ".heading_H h1".to_string(),
            date_selector: ".post-date-time".to_string(),
            date_format: "%B %d, %Y".to_string(),
            body_selector: ".content-area p".to_string(),
            image_selector: ".medium-insert-images img".to_string(),
        }
    }
}
