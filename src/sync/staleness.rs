//! Staleness detection
//!
//! Two checks decide what gets regenerated:
//! - CMS children whose `lastmod` date is newer than the canonical index's
//!   record for the same path, or that the canonical index lacks entirely
//! - the pages map, which is compared entry for entry against its
//!   third-party mirror because its canonical copy is not produced by the CMS

use crate::dates::parse_lastmod_date;
use crate::document::{ChildMapView, SitemapIndexView};
use crate::url::url_path;
use crate::Result;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Maps each child path in the canonical index to its `lastmod` date
///
/// When a path appears twice, the later entry wins.
pub fn canonical_dates(index: &SitemapIndexView) -> Result<HashMap<String, NaiveDate>> {
    let mut dates = HashMap::new();
    for entry in index.entries()? {
        let path = url_path(&entry.location)?;
        let date = parse_lastmod_date(&entry.last_modified)?;
        dates.insert(path, date);
    }
    Ok(dates)
}

/// Finds CMS children that need to be regenerated
///
/// A child is stale when the canonical index has no entry for its path, or
/// when the CMS date is strictly newer. Dates compare by calendar day, so a
/// child touched later on the same day is still fresh. The pages map is
/// skipped; `pages_map_needs_refresh` handles it.
///
/// Returns CMS locations in document order, without duplicates.
pub fn find_stale_children(
    cms: &SitemapIndexView,
    canonical: &SitemapIndexView,
    pages_map_path: &str,
) -> Result<Vec<String>> {
    let known = canonical_dates(canonical)?;
    let mut seen = HashSet::new();
    let mut stale = Vec::new();

    for entry in cms.entries()? {
        let path = url_path(&entry.location)?;
        if path == pages_map_path {
            continue;
        }

        let cms_date = parse_lastmod_date(&entry.last_modified)?;
        let is_stale = match known.get(&path) {
            Some(canonical_date) => cms_date > *canonical_date,
            None => true,
        };

        tracing::debug!(
            "{} (cms {}, canonical {:?}) stale={}",
            path,
            cms_date,
            known.get(&path),
            is_stale
        );

        let location = entry.location.trim().to_string();
        if is_stale && seen.insert(location.clone()) {
            stale.push(location);
        }
    }

    Ok(stale)
}

/// Maps each URL path in a child map to its raw `lastmod` text
///
/// Entries whose location is listed in `excluded` are left out.
pub fn lastmods_by_path(map: &ChildMapView, excluded: &[String]) -> Result<HashMap<String, String>> {
    let mut lastmods = HashMap::new();
    for entry in map.entries()? {
        let location = entry.location.trim();
        if excluded.iter().any(|skip| skip == location) {
            continue;
        }
        lastmods.insert(url_path(location)?, entry.last_modified.unwrap_or_default());
    }
    Ok(lastmods)
}

/// Returns true when the canonical pages map no longer mirrors the third-party map
///
/// The synthetic entries the engine injects are stripped from the canonical
/// map first. What remains must match the mirror exactly: same paths, same
/// `lastmod` strings. There is no date ordering here, only equality.
pub fn pages_map_needs_refresh(
    canonical_pages: &ChildMapView,
    mirror: &ChildMapView,
    synthetic_locations: &[String],
) -> Result<bool> {
    let canonical = lastmods_by_path(canonical_pages, synthetic_locations)?;
    let mirrored = lastmods_by_path(mirror, &[])?;
    Ok(canonical != mirrored)
}
