//! Document source trait and error types
//!
//! The sync engine never talks to the network or the filesystem directly;
//! it asks a `DocumentSource` for bytes and freshness metadata.

use crate::url::LocationKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading documents
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request for {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid Last-Modified header for {url}: {source}")]
    LastModified {
        url: String,
        source: crate::dates::DateError,
    },
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// A fetched document: status code plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub status: u16,
    pub body: String,
}

impl FetchedDocument {
    /// Anything below 400 counts as a usable response
    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// Trait for document source implementations
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetches a URL, returning whatever status the server answered with
    ///
    /// Only transport failures are errors; a 404 is a successful fetch of a
    /// failed response.
    async fn fetch(&self, url: &str) -> SourceResult<FetchedDocument>;

    /// Reads the `Last-Modified` metadata of a URL, `None` when absent
    async fn last_modified(&self, url: &str) -> SourceResult<Option<DateTime<Utc>>>;

    /// Reads a local file
    async fn read_local(&self, path: &Path) -> SourceResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SourceError::Io {
                path: path.display().to_string(),
                source,
            })
    }

    /// Loads a configured location: URLs are fetched, anything else is read from disk
    ///
    /// Unlike `fetch`, a non-success status is an error here.
    async fn load(&self, location: &str) -> SourceResult<String> {
        match LocationKind::of(location) {
            LocationKind::Remote => {
                let fetched = self.fetch(location).await?;
                if !fetched.is_success() {
                    return Err(SourceError::Status {
                        url: location.to_string(),
                        status: fetched.status,
                    });
                }
                Ok(fetched.body)
            }
            LocationKind::Local => self.read_local(Path::new(location)).await,
        }
    }
}
