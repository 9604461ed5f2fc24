//! Configuration module for Sitemap-Sync
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_sync::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sync.toml")).unwrap();
//! println!("Publishing under: {}", config.sites.canonical_base);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, RssConfig, SanitizeConfig, SitesConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
