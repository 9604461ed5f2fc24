//! Pages map augmentation
//!
//! The pages mirror only knows about the pages it hosts. The canonical site
//! also serves landing pages that live elsewhere (the blog and the docs), so
//! entries for those are injected at the top of the refreshed pages map.

use crate::config::SitesConfig;
use crate::document::{ChildMapView, DocumentResult, UrlEntry};
use crate::url::canonical_location;
use crate::{Result, UrlError};
use url::Url;

const CHANGE_FREQUENCY: &str = "weekly";
const PRIORITY: &str = "0.75";

/// Injects synthetic landing page entries into the pages child map
#[derive(Debug, Clone)]
pub struct PageAugmenter {
    canonical_base: Url,
    pages: Vec<String>,
    mirror: String,
}

impl PageAugmenter {
    pub fn new(sites: &SitesConfig) -> Result<Self> {
        let canonical_base = Url::parse(&sites.canonical_base).map_err(|source| UrlError::Parse {
            url: sites.canonical_base.clone(),
            source,
        })?;

        Ok(Self {
            canonical_base,
            pages: sites.synthetic_pages.clone(),
            mirror: sites.pages_mirror.trim().to_string(),
        })
    }

    /// True for the child fetched from the pages mirror, and only for it
    pub fn applies_to(&self, location: &str) -> bool {
        location.trim() == self.mirror
    }

    /// Locations of the injected pages, in insertion order
    pub fn synthetic_locations(&self) -> Vec<String> {
        self.pages
            .iter()
            .map(|page| canonical_location(&self.canonical_base, page))
            .collect()
    }

    /// Entries to inject, all stamped with `today`
    pub fn synthetic_entries(&self, today: &str) -> Vec<UrlEntry> {
        self.synthetic_locations()
            .into_iter()
            .map(|location| UrlEntry {
                location,
                last_modified: Some(today.to_string()),
                change_frequency: Some(CHANGE_FREQUENCY.to_string()),
                priority: Some(PRIORITY.to_string()),
            })
            .collect()
    }

    /// Parses a sanitized pages map and returns it with the synthetic entries
    /// placed before its first `<url>`
    pub fn augment(&self, body: &str, today: &str) -> DocumentResult<String> {
        ChildMapView::parse(body)?
            .with_entries_before_first(&self.synthetic_entries(today))
            .to_xml()
    }
}
