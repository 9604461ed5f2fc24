use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the path component of a location
///
/// This is the join key between the CMS index and the canonical index: two
/// entries with the same path on different domains describe the same child.
///
/// # Examples
///
/// ```
/// use sitemap_sync::url::url_path;
///
/// assert_eq!(url_path("https://cucumber.ghost.io/sitemap-posts.xml").unwrap(), "/sitemap-posts.xml");
/// assert_eq!(url_path("https://cucumber.io").unwrap(), "/");
/// assert!(url_path("sitemap-posts.xml").is_err());
/// ```
pub fn url_path(location: &str) -> UrlResult<String> {
    let url = Url::parse(location.trim()).map_err(|source| UrlError::Parse {
        url: location.to_string(),
        source,
    })?;

    if url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase(location.to_string()));
    }

    Ok(url.path().to_string())
}

/// Builds a location under the canonical base for the given path
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_sync::url::canonical_location;
///
/// let base = Url::parse("https://cucumber.io").unwrap();
/// assert_eq!(canonical_location(&base, "/sitemap-tags.xml"), "https://cucumber.io/sitemap-tags.xml");
/// assert_eq!(canonical_location(&base, "blog"), "https://cucumber.io/blog");
/// ```
pub fn canonical_location(base: &Url, path: &str) -> String {
    let origin = base.as_str().trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", origin, path)
    } else {
        format!("{}/{}", origin, path)
    }
}
