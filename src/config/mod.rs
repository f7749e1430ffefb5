//! Configuration module for Sumi-Press
//!
//! This module handles loading TOML configuration files, applying environment
//! overrides, validating the result, and compiling the site selectors.
//!
//! # Example
//!
//! ```no_run
//! use sumi_press::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("press.toml")).unwrap();
//! println!("Images go to: {}", config.images.folder);
//! ```

mod parser;
mod selectors;
mod types;
mod validation;

// Re-export types
pub use selectors::SiteSelectors;
pub use types::{Config, HttpConfig, ImageConfig, SiteConfig, StorageConfig};

// Re-export parser functions
pub use parser::{apply_env_overrides, apply_overrides, load_config, resolve_config};
pub use validation::validate;
