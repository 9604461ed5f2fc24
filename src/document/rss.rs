//! Typed view over RSS 2.0 feeds

use crate::document::tree::{Document, Element};
use crate::document::{parse_with_root, DocumentError, DocumentResult};

/// One `<item>` of a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
}

/// An RSS feed (`<rss><channel>...`)
#[derive(Debug, Clone)]
pub struct RssFeedView {
    document: Document,
}

impl RssFeedView {
    pub fn parse(xml: &str) -> DocumentResult<Self> {
        Ok(Self {
            document: parse_with_root(xml, "rss")?,
        })
    }

    /// Items of the feed's channel, in document order
    pub fn items(&self) -> DocumentResult<Vec<FeedItem>> {
        let Some(channel) = self.document.root().child("channel") else {
            return Ok(Vec::new());
        };

        channel
            .elements()
            .filter(|element| element.is("item"))
            .map(|item| -> DocumentResult<FeedItem> {
                Ok(FeedItem {
                    title: item.child_text("title")?,
                    link: item.child_text("link")?,
                })
            })
            .collect()
    }

    /// Text of the first `<generator>` element, if any
    pub fn generator(&self) -> DocumentResult<Option<String>> {
        self.document.root().find("generator").map(|g| g.text()).transpose()
    }

    /// Returns a copy whose first `<generator>` element holds `text`
    pub fn with_generator(&self, text: &str) -> DocumentResult<Self> {
        let root = self
            .document
            .root()
            .with_first_replaced("generator", &mut |generator: &Element| {
                generator.with_text(text)
            })
            .ok_or_else(|| DocumentError::MissingElement("generator".to_string()))?;

        Ok(Self {
            document: self.document.with_root(root),
        })
    }

    pub fn to_xml(&self) -> DocumentResult<String> {
        self.document.to_xml()
    }
}
