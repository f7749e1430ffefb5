use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Environment variables that override file settings
const ENV_OVERRIDES: &[&str] = &[
    "DATABASE_PATH",
    "TABLE_NAME",
    "IMAGE_FOLDER",
    "IMAGE_ROUTE",
    "LOG_LEVEL",
];

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_press::config::load_config;
///
/// let config = load_config(Path::new("press.toml")).unwrap();
/// println!("Database: {}", config.storage.database_path);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Builds the effective configuration for a run
///
/// Starts from the file at `path` when given, otherwise from defaults, then
/// applies environment overrides and validates the result.
pub fn resolve_config(path: Option<&Path>) -> ConfigResult<Config> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config);
    validate(&config)?;

    Ok(config)
}

/// Applies overrides from the process environment
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Applies overrides from an arbitrary key lookup
///
/// Recognised keys are `DATABASE_PATH`, `TABLE_NAME`, `IMAGE_FOLDER`,
/// `IMAGE_ROUTE` and `LOG_LEVEL`. Empty values are ignored.
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for key in ENV_OVERRIDES {
        let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) else {
            continue;
        };

        tracing::debug!("Config override from {}", key);

        match *key {
            "DATABASE_PATH" => config.storage.database_path = value,
            "TABLE_NAME" => config.storage.table_name = value,
            "IMAGE_FOLDER" => config.images.folder = value,
            "IMAGE_ROUTE" => config.images.route = value,
            "LOG_LEVEL" => config.log_level = value.to_lowercase(),
            _ => {}
        }
    }
}
