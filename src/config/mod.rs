//! Configuration module for Garimpo
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The configuration carries everything a run needs: the base listing
//! URL, page limits, pacing delays, HTTP identity, the selector tables for
//! listing and ad pages, and the output location.
//!
//! # Example
//!
//! ```no_run
//! use garimpo::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Scraping from: {}", config.scraper.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AdSelectorsConfig, Config, HttpConfig, ListingSelectorsConfig, OutputConfig,
    PaginationConfig, ScraperConfig, SelectorsConfig,
};

// Re-export parser functions
pub use parser::load_config;
