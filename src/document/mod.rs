//! Document module: XML parsing and typed views over the documents we sync
//!
//! This module contains:
//! - An owned XML tree with strict parsing and serialization
//! - Typed views for sitemap indexes, child sitemaps and RSS feeds
//!
//! Views never edit a tree in place. Every edit returns a new view, so a
//! document read in one step cannot change underneath another.

mod rss;
mod sitemap;
mod tree;

pub use rss::{FeedItem, RssFeedView};
pub use sitemap::{ChildMapView, IndexEntry, SitemapIndexView, UrlEntry};
pub use tree::{Document, Element, Node};

use thiserror::Error;

/// Errors that can occur while reading or writing documents
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("Invalid text content: {0}")]
    Text(String),

    #[error("Missing <{0}> element")]
    MissingElement(String),

    #[error("Unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot { expected: &'static str, found: String },

    #[error("Failed to serialize XML: {0}")]
    Serialize(String),
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Parses a document and checks the local name of its root element
pub(crate) fn parse_with_root(xml: &str, expected: &'static str) -> DocumentResult<Document> {
    let document = Document::parse(xml)?;
    if !document.root().is(expected) {
        return Err(DocumentError::UnexpectedRoot {
            expected,
            found: document.root().name(),
        });
    }
    Ok(document)
}
