//! Typed views over sitemap indexes and child sitemaps

use crate::document::tree::{Document, Element, Node};
use crate::document::{parse_with_root, DocumentError, DocumentResult};

/// One `<sitemap>` entry of a sitemap index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub location: String,
    /// Raw `lastmod` text; empty when the element is missing
    pub last_modified: String,
}

impl IndexEntry {
    pub fn new(location: impl Into<String>, last_modified: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            last_modified: last_modified.into(),
        }
    }

    fn from_element(element: &Element) -> DocumentResult<Self> {
        Ok(Self {
            location: element.child_text("loc")?.unwrap_or_default(),
            last_modified: element.child_text("lastmod")?.unwrap_or_default(),
        })
    }

    fn to_element(&self) -> Element {
        let mut sitemap = Element::new("sitemap");
        sitemap.push(Node::Element(Element::with_text_content("loc", &self.location)));
        sitemap.push(Node::Element(Element::with_text_content(
            "lastmod",
            &self.last_modified,
        )));
        sitemap
    }
}

/// A parent sitemap index (`<sitemapindex>`)
#[derive(Debug, Clone)]
pub struct SitemapIndexView {
    document: Document,
}

impl SitemapIndexView {
    /// Parses a sitemap index, rejecting any other kind of document
    pub fn parse(xml: &str) -> DocumentResult<Self> {
        Ok(Self {
            document: parse_with_root(xml, "sitemapindex")?,
        })
    }

    /// Entries in document order
    pub fn entries(&self) -> DocumentResult<Vec<IndexEntry>> {
        self.document
            .root()
            .elements()
            .filter(|element| element.is("sitemap"))
            .map(IndexEntry::from_element)
            .collect()
    }

    /// Returns a copy where each entry's `lastmod` may be replaced
    ///
    /// `update` sees every entry in document order and returns the new
    /// `lastmod` text, or `None` to keep the entry exactly as it was. Nodes
    /// that are not `<sitemap>` entries are copied through untouched.
    pub fn with_lastmods<E, F>(&self, mut update: F) -> Result<Self, E>
    where
        E: From<DocumentError>,
        F: FnMut(&IndexEntry) -> Result<Option<String>, E>,
    {
        let root = self.document.root();
        let mut children = Vec::with_capacity(root.children().len());

        for node in root.children() {
            let Node::Element(element) = node else {
                children.push(node.clone());
                continue;
            };
            if !element.is("sitemap") {
                children.push(node.clone());
                continue;
            }

            let entry = IndexEntry::from_element(element)?;
            match update(&entry)? {
                Some(last_modified) => {
                    children.push(Node::Element(element.with_child_text("lastmod", &last_modified)))
                }
                None => children.push(node.clone()),
            }
        }

        Ok(Self {
            document: self.document.with_root(root.with_children(children)),
        })
    }

    /// Returns a copy with `entries` appended after the last existing child, in order
    pub fn with_appended(&self, entries: &[IndexEntry]) -> Self {
        let root = self.document.root();
        let mut children = root.children().to_vec();
        children.extend(entries.iter().map(|entry| Node::Element(entry.to_element())));

        Self {
            document: self.document.with_root(root.with_children(children)),
        }
    }

    pub fn to_xml(&self) -> DocumentResult<String> {
        self.document.to_xml()
    }
}

/// One `<url>` entry of a child sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    pub location: String,
    pub last_modified: Option<String>,
    pub change_frequency: Option<String>,
    pub priority: Option<String>,
}

impl UrlEntry {
    fn from_element(element: &Element) -> DocumentResult<Self> {
        Ok(Self {
            location: element.child_text("loc")?.unwrap_or_default(),
            last_modified: element.child_text("lastmod")?,
            change_frequency: element.child_text("changefreq")?,
            priority: element.child_text("priority")?,
        })
    }

    fn to_element(&self) -> Element {
        let mut url = Element::new("url");
        url.push(Node::Element(Element::with_text_content("loc", &self.location)));

        let optional = [
            ("changefreq", &self.change_frequency),
            ("priority", &self.priority),
            ("lastmod", &self.last_modified),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                url.push(Node::Element(Element::with_text_content(name, value)));
            }
        }
        url
    }
}

/// A child sitemap (`<urlset>`)
#[derive(Debug, Clone)]
pub struct ChildMapView {
    document: Document,
}

impl ChildMapView {
    /// Parses a child sitemap, rejecting any other kind of document
    pub fn parse(xml: &str) -> DocumentResult<Self> {
        Ok(Self {
            document: parse_with_root(xml, "urlset")?,
        })
    }

    /// Entries in document order
    pub fn entries(&self) -> DocumentResult<Vec<UrlEntry>> {
        self.document
            .root()
            .elements()
            .filter(|element| element.is("url"))
            .map(UrlEntry::from_element)
            .collect()
    }

    /// Returns a copy with `entries` inserted, in order, right before the first `<url>`
    ///
    /// A map without any `<url>` gets them appended instead.
    pub fn with_entries_before_first(&self, entries: &[UrlEntry]) -> Self {
        let root = self.document.root();
        let first_url = root
            .children()
            .iter()
            .position(|node| matches!(node, Node::Element(element) if element.is("url")))
            .unwrap_or(root.children().len());

        let mut children = root.children().to_vec();
        children.splice(
            first_url..first_url,
            entries.iter().map(|entry| Node::Element(entry.to_element())),
        );

        Self {
            document: self.document.with_root(root.with_children(children)),
        }
    }

    pub fn to_xml(&self) -> DocumentResult<String> {
        self.document.to_xml()
    }
}
