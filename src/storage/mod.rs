//! Storage module for persisting finished documents
//!
//! This module handles writing the regenerated child sitemaps, the merged
//! parent index and the RSS feed to their published locations.

mod fs;
mod traits;

pub use fs::FsStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::path::{Path, PathBuf};

/// Resolves the file a child sitemap is written to
///
/// The child's URL path is appended to the sitemap directory, so
/// `/sitemap-posts.xml` lands at `<dir>/sitemap-posts.xml`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use sitemap_sync::storage::child_output_path;
///
/// assert_eq!(
///     child_output_path(Path::new("./static/sitemaps"), "/sitemap-posts.xml").unwrap(),
///     PathBuf::from("./static/sitemaps/sitemap-posts.xml")
/// );
/// ```
pub fn child_output_path(dir: &Path, url_path: &str) -> StorageResult<PathBuf> {
    let relative = url_path.trim_start_matches('/');

    // Paths come from fetched documents; never let them climb out of `dir`
    if relative.is_empty() || relative.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidPath(url_path.to_string()));
    }

    Ok(dir.join(relative))
}
