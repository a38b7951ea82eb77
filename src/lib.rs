//! Garimpo: a classifieds listing harvester
//!
//! This crate walks paginated result pages of a classifieds site, visits each
//! ad's detail page, extracts structured fields through a configurable CSS
//! selector table, and exports the collected batch to tabular files.

pub mod config;
pub mod crawler;
pub mod export;
pub mod record;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for Garimpo operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector for '{field}': {message}")]
    InvalidSelector { field: String, message: String },
}

/// Result type alias for Garimpo operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{AdRecord, FieldValue};
