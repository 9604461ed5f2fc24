//! URL handling module for Sitemap-Sync
//!
//! Index entries are joined across domains by their URL path, so most of
//! this module is about getting from a full location to that path and back.

mod path;

pub use path::{canonical_location, url_path};

/// Where a configured document lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    /// Fetched over HTTP(S)
    Remote,
    /// Read from the local filesystem
    Local,
}

impl LocationKind {
    /// Classifies a configured location string
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_sync::url::LocationKind;
    ///
    /// assert_eq!(LocationKind::of("https://cucumber.io/sitemap.xml"), LocationKind::Remote);
    /// assert_eq!(LocationKind::of("./static/sitemaps/sitemap.xml"), LocationKind::Local);
    /// ```
    pub fn of(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Remote
        } else {
            Self::Local
        }
    }
}
