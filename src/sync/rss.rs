//! RSS feed regeneration
//!
//! The canonical feed is a rewritten copy of the CMS feed. It is only
//! regenerated when the CMS feed's `Last-Modified` is newer.

use crate::dates::epoch;
use crate::document::{DocumentError, DocumentResult, RssFeedView};
use crate::sync::sanitizer::RssRewriter;
use chrono::{DateTime, Utc};

/// Decides whether the CMS feed is newer than the published one
///
/// A missing header counts as the Unix epoch, so a CMS feed with a header
/// always beats a canonical feed without one. Equal times are not newer.
pub fn should_regenerate(
    cms_modified: Option<DateTime<Utc>>,
    canonical_modified: Option<DateTime<Utc>>,
) -> bool {
    cms_modified.unwrap_or_else(epoch) > canonical_modified.unwrap_or_else(epoch)
}

/// A feed ready to publish
#[derive(Debug, Clone)]
pub struct FinalizedFeed {
    pub xml: String,
    pub items: usize,
}

/// Rewrites the CMS feed onto the canonical domain and tags its generator
///
/// The generator element keeps its text with `suffix` appended. A feed
/// without one is rejected.
pub fn finalize_feed(
    body: &str,
    rewriter: &RssRewriter,
    suffix: &str,
) -> DocumentResult<FinalizedFeed> {
    let feed = RssFeedView::parse(&rewriter.rewrite(body))?;

    let generator = feed
        .generator()?
        .ok_or_else(|| DocumentError::MissingElement("generator".to_string()))?;
    let feed = feed.with_generator(&format!("{generator}{suffix}"))?;

    Ok(FinalizedFeed {
        items: feed.items()?.len(),
        xml: feed.to_xml()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RssConfig;
    use chrono::TimeZone;

    fn at(hour: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap())
    }

    #[test]
    fn test_newer_cms_feed_regenerates() {
        assert!(should_regenerate(at(11), at(10)));
    }

    #[test]
    fn test_equal_or_older_cms_feed_skips() {
        assert!(!should_regenerate(at(10), at(10)));
        assert!(!should_regenerate(at(9), at(10)));
    }

    #[test]
    fn test_missing_headers_count_as_epoch() {
        assert!(should_regenerate(at(10), None));
        assert!(!should_regenerate(None, at(10)));
        assert!(!should_regenerate(None, None));
    }

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Cucumber</title>
    <link>https://cucumber.ghost.io/</link>
    <generator>Ghost 5.75</generator>
    <item>
      <title>Post</title>
      <link>https://cucumber.ghost.io/blog/post/</link>
      <description><![CDATA[<img src="https://cucumber.ghost.io/content/images/a.png">]]></description>
    </item>
  </channel>
</rss>"#;

    fn rewriter() -> RssRewriter {
        RssRewriter::new(&RssConfig::default().rewrites)
    }

    #[test]
    fn test_finalize_rewrites_and_tags_generator() {
        let feed = finalize_feed(FEED, &rewriter(), " & Cucumber").unwrap();

        assert_eq!(feed.items, 1);
        assert!(!feed.xml.contains("cucumber.ghost.io"));
        assert!(feed.xml.contains("https://cucumber.io/blog/post/"));
        assert!(feed.xml.contains("https://cucumber.io/content/images/a.png"));

        let view = RssFeedView::parse(&feed.xml).unwrap();
        assert_eq!(view.generator().unwrap().as_deref(), Some("Ghost 5.75 & Cucumber"));
    }

    #[test]
    fn test_missing_generator_is_an_error() {
        let body = "<rss version=\"2.0\"><channel><title>x</title></channel></rss>";
        let result = finalize_feed(body, &rewriter(), " & Cucumber");

        assert!(matches!(result, Err(DocumentError::MissingElement(_))));
    }

    #[test]
    fn test_non_rss_document_rejected() {
        let result = finalize_feed("<urlset/>", &rewriter(), " & Cucumber");
        assert!(matches!(result, Err(DocumentError::UnexpectedRoot { .. })));
    }
}
