//! Parent index merging
//!
//! After children are written, the canonical parent index is brought in line:
//! entries for refreshed paths get a new `lastmod`, paths the index has never
//! listed are appended, and everything else is left byte-for-byte alone.

use crate::document::{IndexEntry, SitemapIndexView};
use crate::url::{canonical_location, url_path};
use crate::Result;
use url::Url;

/// The merged parent index plus what changed in it
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub index: SitemapIndexView,
    /// Paths whose existing entry got a new `lastmod`, in document order
    pub updated: Vec<String>,
    /// Locations of the entries added at the end, in order
    pub appended: Vec<String>,
}

/// Merges refreshed child paths into the parent index
///
/// `refreshed` lists the URL paths of the children written this run; repeats
/// are ignored. For each path the first index entry with that path is
/// stamped with `timestamp`. Paths with no entry are appended as new
/// entries under `canonical_base`, in the order they were written.
pub fn merge_parent(
    parent: &SitemapIndexView,
    refreshed: &[String],
    timestamp: &str,
    canonical_base: &Url,
) -> Result<MergeOutcome> {
    let mut pending: Vec<String> = Vec::with_capacity(refreshed.len());
    for path in refreshed {
        if !pending.contains(path) {
            pending.push(path.clone());
        }
    }

    let mut updated = Vec::new();
    let index = parent.with_lastmods(|entry| -> Result<Option<String>> {
        let path = url_path(&entry.location)?;
        match pending.iter().position(|candidate| *candidate == path) {
            Some(position) => {
                pending.remove(position);
                updated.push(path);
                Ok(Some(timestamp.to_string()))
            }
            None => Ok(None),
        }
    })?;

    let additions: Vec<IndexEntry> = pending
        .iter()
        .map(|path| IndexEntry::new(canonical_location(canonical_base, path), timestamp))
        .collect();
    let appended = additions.iter().map(|entry| entry.location.clone()).collect();

    tracing::debug!(
        "Merged parent index: {} updated, {} appended",
        updated.len(),
        additions.len()
    );

    Ok(MergeOutcome {
        index: index.with_appended(&additions),
        updated,
        appended,
    })
}
