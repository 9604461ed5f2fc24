//! Sitemap-Sync: keeps a canonical site's sitemaps and RSS feed in step with its CMS mirror
//!
//! This crate detects stale child sitemaps by comparing two sitemap indexes,
//! sanitizes the refreshed documents so every URL points at the canonical
//! domain, and merges the results back into the canonical parent index.

pub mod config;
pub mod dates;
pub mod document;
pub mod output;
pub mod source;
pub mod storage;
pub mod sync;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Sync operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Date error: {0}")]
    Date(#[from] dates::DateError),

    #[error("Document error in {location}: {source}")]
    Document {
        location: String,
        source: document::DocumentError,
    },

    #[error("XML error: {0}")]
    Xml(#[from] document::DocumentError),

    #[error("Invalid rewrite pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Source error: {0}")]
    Source(#[from] source::SourceError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}

impl SyncError {
    /// Wraps a document error with the location of the offending document
    pub fn document(location: impl Into<String>, source: document::DocumentError) -> Self {
        Self::Document {
            location: location.into(),
            source,
        }
    }
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

    #[error("Invalid host: {0}")]
    InvalidHost(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{url}': {source}")]
    Parse {
        url: String,
        source: ::url::ParseError,
    },

    #[error("URL cannot carry a path: {0}")]
    CannotBeABase(String),
}

/// Result type alias for Sitemap-Sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use dates::RunClock;
pub use output::{RssOutcome, SitemapReport};
pub use sync::Reconciler;
pub use crate::url::{canonical_location, url_path};
