//! HTTP document source
//!
//! This module handles every request the sync engine makes:
//! - Building the HTTP client with an identifying user agent
//! - GET requests for sitemaps and feeds
//! - HEAD requests to read `Last-Modified` metadata
//!
//! Nothing is retried here. A child that fails to load is simply picked up
//! again as stale on the next run.

use crate::config::UserAgentConfig;
use crate::dates::parse_http_date;
use crate::source::traits::{DocumentSource, FetchedDocument, SourceError, SourceResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::LAST_MODIFIED;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use sitemap_sync::config::UserAgentConfig;
/// use sitemap_sync::source::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent(config))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent as `Name/Version (+ContactURL; ContactEmail)`
pub fn user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Document source backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a source with a client configured from the user agent settings
    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, url: &str) -> SourceResult<FetchedDocument> {
        let http_error = |source| SourceError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(http_error)?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(FetchedDocument { status, body })
    }

    async fn last_modified(&self, url: &str) -> SourceResult<Option<DateTime<Utc>>> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })?;

        // reqwest header lookups are case-insensitive
        let Some(value) = response.headers().get(LAST_MODIFIED) else {
            tracing::debug!("HEAD {} -> no Last-Modified header", url);
            return Ok(None);
        };

        let text = String::from_utf8_lossy(value.as_bytes());
        let parsed = parse_http_date(&text).map_err(|source| SourceError::LastModified {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!("HEAD {} -> Last-Modified {}", url, parsed);

        Ok(Some(parsed))
    }
}
