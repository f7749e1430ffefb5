use crate::config::selectors::SiteSelectors;
use crate::config::types::{Config, HttpConfig, ImageConfig, SiteConfig, StorageConfig};
use crate::{ConfigError, ConfigResult};

/// Validates the entire configuration
///
/// Only values that would break the pipeline in confusing ways are checked.
/// Whether the database can be opened or the image folder written is left
/// to the first operation that needs it.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_http_config(&config.http)?;
    validate_storage_config(&config.storage)?;
    validate_image_config(&config.images)?;
    validate_site_config(&config.site)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> ConfigResult<()> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates store configuration
fn validate_storage_config(config: &StorageConfig) -> ConfigResult<()> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    validate_table_name(&config.table_name)
}

/// Table names are interpolated into SQL, so only identifier characters are allowed
fn validate_table_name(name: &str) -> ConfigResult<()> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "table_name cannot be empty".to_string(),
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::Validation(format!(
            "table_name must contain only ASCII letters, digits and underscores, got '{}'",
            name
        )));
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ConfigError::Validation(format!(
            "table_name cannot start with a digit, got '{}'",
            name
        )));
    }

    Ok(())
}

/// Validates image storage configuration
fn validate_image_config(config: &ImageConfig) -> ConfigResult<()> {
    if config.folder.is_empty() {
        return Err(ConfigError::Validation(
            "image folder cannot be empty".to_string(),
        ));
    }

    if !config.route.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "image route must start with '/', got '{}'",
            config.route
        )));
    }

    if config.chunk_size == 0 {
        return Err(ConfigError::Validation(
            "chunk_size must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the site layout settings
fn validate_site_config(config: &SiteConfig) -> ConfigResult<()> {
    if config.article_path_segment.is_empty() {
        return Err(ConfigError::Validation(
            "article_path_segment cannot be empty".to_string(),
        ));
    }

    if config.date_format.is_empty() {
        return Err(ConfigError::Validation(
            "date_format cannot be empty".to_string(),
        ));
    }

    SiteSelectors::compile(config)?;

    Ok(())
}
