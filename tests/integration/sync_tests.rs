//! Integration tests for the reconciler
//!
//! These tests use wiremock to stand in for the CMS, the canonical site and
//! the pages mirror, and run full batches into temporary directories.

use chrono::{TimeZone, Utc};
use sitemap_sync::config::{Config, OutputConfig, RssConfig, SitesConfig};
use sitemap_sync::document::{ChildMapView, RssFeedView, SitemapIndexView};
use sitemap_sync::source::HttpSource;
use sitemap_sync::storage::FsStorage;
use sitemap_sync::{Reconciler, RssOutcome, RunClock};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STAMP: &str = "2024-03-01T10:15:00.000Z";

fn clock() -> RunClock {
    RunClock::at(Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap())
}

/// Points every configured location at the mock server
fn create_test_config(base_url: &str, out: &Path) -> Config {
    let out_path = |name: &str| out.join(name).to_str().unwrap().to_string();

    Config {
        sites: SitesConfig {
            cms_index: format!("{}/ghost/sitemap.xml", base_url),
            canonical_index: format!("{}/sitemap.xml", base_url),
            canonical_pages: format!("{}/sitemap-pages.xml", base_url),
            pages_mirror: format!("{}/squarespace/sitemap.xml", base_url),
            ..SitesConfig::default()
        },
        rss: RssConfig {
            cms_feed: format!("{}/ghost/rss/", base_url),
            canonical_feed: format!("{}/blog/rss", base_url),
            ..RssConfig::default()
        },
        output: OutputConfig {
            sitemap_dir: out.to_str().unwrap().to_string(),
            parent_path: out_path("sitemap.xml"),
            rss_path: out_path("rss/rss.xml"),
        },
        ..Config::default()
    }
}

fn index(entries: &[(String, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(loc, lastmod)| {
            format!(
                "  <sitemap>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </sitemap>\n",
                loc, lastmod
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</sitemapindex>",
        body
    )
}

fn canonical_index() -> String {
    index(&[
        (
            "https://cucumber.io/sitemap-pages.xml".to_string(),
            "2024-01-01T00:00:00.000Z",
        ),
        (
            "https://cucumber.io/sitemap-posts.xml".to_string(),
            "2024-02-01T00:00:00.000Z",
        ),
    ])
}

const CANONICAL_PAGES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://cucumber.io/blog</loc><lastmod>2024-02-01</lastmod></url>
  <url><loc>https://cucumber.io/docs</loc><lastmod>2024-02-01</lastmod></url>
  <url><loc>https://cucumber.io/about</loc><lastmod>2024-01-05</lastmod></url>
</urlset>"#;

const MIRROR_IN_SYNC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://cucumber-website.squarespace.com/about</loc><lastmod>2024-01-05</lastmod></url>
</urlset>"#;

const POSTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<?xml-stylesheet type="text/xsl" href="//cucumber.ghost.io/sitemap.xsl"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://cucumber.ghost.io/blog/new-release/</loc><lastmod>2024-02-20</lastmod></url>
</urlset>"#;

async fn mount_get(server: &MockServer, at: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_canonical_side(server: &MockServer, mirror: &str) {
    mount_get(server, "/sitemap.xml", 200, &canonical_index()).await;
    mount_get(server, "/sitemap-pages.xml", 200, CANONICAL_PAGES).await;
    mount_get(server, "/squarespace/sitemap.xml", 200, mirror).await;
}

fn reconciler(config: Config) -> Reconciler<HttpSource, FsStorage> {
    let source = HttpSource::from_config(&config.user_agent).expect("Failed to build client");
    Reconciler::new(config, source, FsStorage::new()).expect("Failed to create reconciler")
}

fn read_parent(out: &Path) -> SitemapIndexView {
    let xml = std::fs::read_to_string(out.join("sitemap.xml")).expect("parent index not written");
    SitemapIndexView::parse(&xml).expect("parent index unparseable")
}

#[tokio::test]
async fn test_stale_children_refreshed_and_merged() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let out = TempDir::new().unwrap();

    mount_canonical_side(&server, MIRROR_IN_SYNC).await;
    mount_get(
        &server,
        "/ghost/sitemap.xml",
        200,
        &index(&[
            (format!("{}/sitemap-pages.xml", base_url), "2024-03-01T00:00:00.000Z"),
            (format!("{}/sitemap-posts.xml", base_url), "2024-02-20T08:00:00.000Z"),
            (format!("{}/sitemap-tags.xml", base_url), "2024-02-10T08:00:00.000Z"),
        ]),
    )
    .await;
    mount_get(&server, "/sitemap-posts.xml", 200, POSTS).await;
    mount_get(
        &server,
        "/sitemap-tags.xml",
        200,
        "<urlset><url><loc>https://cucumber.ghost.io/tag/bdd/</loc></url></urlset>",
    )
    .await;

    let r = reconciler(create_test_config(&base_url, out.path()));
    let report = r.run_sitemaps(&clock()).await.expect("Sitemap batch failed");

    assert_eq!(report.stale_children.len(), 2);
    assert!(report.skipped_children.is_empty());

    // Children are sanitized onto the canonical domain
    let posts = std::fs::read_to_string(out.path().join("sitemap-posts.xml")).unwrap();
    assert!(posts.contains("<loc>https://cucumber.io/blog/new-release/</loc>"));
    assert!(!posts.contains("xml-stylesheet"));
    assert!(!posts.contains(".ghost"));

    let tags = std::fs::read_to_string(out.path().join("sitemap-tags.xml")).unwrap();
    assert!(tags.contains("https://cucumber.io/tag/bdd/"));

    // The pages map was in sync, so it was not touched
    assert!(!out.path().join("sitemap-pages.xml").exists());

    let entries = read_parent(out.path()).entries().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].location, "https://cucumber.io/sitemap-pages.xml");
    assert_eq!(entries[0].last_modified, "2024-01-01T00:00:00.000Z");
    assert_eq!(entries[1].location, "https://cucumber.io/sitemap-posts.xml");
    assert_eq!(entries[1].last_modified, STAMP);
    assert_eq!(entries[2].location, "https://cucumber.io/sitemap-tags.xml");
    assert_eq!(entries[2].last_modified, STAMP);
}

#[tokio::test]
async fn test_failed_child_skipped_and_not_appended() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let out = TempDir::new().unwrap();

    mount_canonical_side(&server, MIRROR_IN_SYNC).await;
    mount_get(
        &server,
        "/ghost/sitemap.xml",
        200,
        &index(&[
            (format!("{}/sitemap-posts.xml", base_url), "2024-02-20"),
            (format!("{}/sitemap-authors.xml", base_url), "2024-02-20"),
        ]),
    )
    .await;
    mount_get(&server, "/sitemap-posts.xml", 200, POSTS).await;
    mount_get(&server, "/sitemap-authors.xml", 500, "Internal Server Error").await;

    let r = reconciler(create_test_config(&base_url, out.path()));
    let report = r.run_sitemaps(&clock()).await.expect("Sitemap batch failed");

    assert_eq!(
        report.skipped_children,
        vec![format!("{}/sitemap-authors.xml", base_url)]
    );
    assert!(!out.path().join("sitemap-authors.xml").exists());
    assert!(out.path().join("sitemap-posts.xml").exists());

    let entries = read_parent(out.path()).entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| !e.location.ends_with("sitemap-authors.xml")));
}

#[tokio::test]
async fn test_pages_map_refreshed_from_mirror() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let out = TempDir::new().unwrap();

    let mirror = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://cucumber-website.squarespace.com/about</loc><lastmod>2024-01-05</lastmod></url>
  <url><loc>https://cucumber-website.squarespace.com/pricing</loc><lastmod>2024-02-28</lastmod></url>
</urlset>"#;

    mount_canonical_side(&server, mirror).await;
    mount_get(
        &server,
        "/ghost/sitemap.xml",
        200,
        &index(&[(format!("{}/sitemap-posts.xml", base_url), "2024-02-01")]),
    )
    .await;

    let r = reconciler(create_test_config(&base_url, out.path()));
    let report = r.run_sitemaps(&clock()).await.expect("Sitemap batch failed");

    assert_eq!(
        report.stale_children,
        vec![format!("{}/squarespace/sitemap.xml", base_url)]
    );

    let pages = std::fs::read_to_string(out.path().join("sitemap-pages.xml")).unwrap();
    let entries = ChildMapView::parse(&pages).unwrap().entries().unwrap();
    let locations: Vec<_> = entries.iter().map(|e| e.location.as_str()).collect();
    assert_eq!(
        locations,
        vec![
            "https://cucumber.io/blog",
            "https://cucumber.io/docs",
            "https://cucumber.io/about",
            "https://cucumber.io/pricing",
        ]
    );
    assert_eq!(entries[0].last_modified.as_deref(), Some("2024-03-01"));
    assert_eq!(entries[1].priority.as_deref(), Some("0.75"));

    let parent = read_parent(out.path()).entries().unwrap();
    assert_eq!(parent[0].location, "https://cucumber.io/sitemap-pages.xml");
    assert_eq!(parent[0].last_modified, STAMP);
    assert_eq!(parent[1].last_modified, "2024-02-01T00:00:00.000Z");
}

#[tokio::test]
async fn test_nothing_stale_writes_nothing() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let out = TempDir::new().unwrap();

    mount_canonical_side(&server, MIRROR_IN_SYNC).await;
    mount_get(
        &server,
        "/ghost/sitemap.xml",
        200,
        &index(&[(format!("{}/sitemap-posts.xml", base_url), "2024-02-01T23:59:00.000Z")]),
    )
    .await;

    let r = reconciler(create_test_config(&base_url, out.path()));
    let report = r.run_sitemaps(&clock()).await.expect("Sitemap batch failed");

    assert!(report.is_up_to_date());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_canonical_index_read_from_disk() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let out = TempDir::new().unwrap();

    let local_index = out.path().join("published-sitemap.xml");
    std::fs::write(&local_index, canonical_index()).unwrap();

    mount_canonical_side(&server, MIRROR_IN_SYNC).await;
    mount_get(
        &server,
        "/ghost/sitemap.xml",
        200,
        &index(&[(format!("{}/sitemap-posts.xml", base_url), "2024-02-20")]),
    )
    .await;
    mount_get(&server, "/sitemap-posts.xml", 200, POSTS).await;

    let mut config = create_test_config(&base_url, out.path());
    config.sites.canonical_index = local_index.to_str().unwrap().to_string();

    let r = reconciler(config);
    let report = r.run_sitemaps(&clock()).await.expect("Sitemap batch failed");

    assert_eq!(report.updated_entries, vec!["/sitemap-posts.xml"]);
    assert_eq!(read_parent(out.path()).entries().unwrap()[1].last_modified, STAMP);
}

#[tokio::test]
async fn test_unreachable_cms_index_is_fatal() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_canonical_side(&server, MIRROR_IN_SYNC).await;
    mount_get(&server, "/ghost/sitemap.xml", 502, "Bad Gateway").await;

    let r = reconciler(create_test_config(&server.uri(), out.path()));
    let result = r.run_sitemaps(&clock()).await;

    assert!(result.is_err());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

async fn mount_last_modified(server: &MockServer, at: &str, value: &str) {
    Mock::given(method("HEAD"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).insert_header("last-modified", value))
        .mount(server)
        .await;
}

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss xmlns:dc="http://purl.org/dc/elements/1.1/" version="2.0">
  <channel>
    <title><![CDATA[Cucumber]]></title>
    <link>https://cucumber.ghost.io/</link>
    <generator>Ghost 5.75</generator>
    <item>
      <title><![CDATA[New release]]></title>
      <link>https://cucumber.ghost.io/blog/new-release/</link>
      <description><![CDATA[<img src="https://cucumber.ghost.io/content/images/cover.png">]]></description>
    </item>
    <item>
      <title><![CDATA[Older post]]></title>
      <link>https://cucumber.ghost.io/blog/older-post/</link>
    </item>
  </channel>
</rss>"#;

#[tokio::test]
async fn test_rss_regenerated_when_cms_is_newer() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_last_modified(&server, "/ghost/rss/", "Fri, 01 Mar 2024 11:00:00 GMT").await;
    mount_last_modified(&server, "/blog/rss", "Fri, 01 Mar 2024 09:00:00 GMT").await;
    mount_get(&server, "/ghost/rss/", 200, FEED).await;

    let r = reconciler(create_test_config(&server.uri(), out.path()));
    let outcome = r.run_rss().await.expect("RSS batch failed");

    let feed_path = out.path().join("rss/rss.xml");
    assert_eq!(
        outcome,
        RssOutcome::Written {
            path: feed_path.clone(),
            items: 2
        }
    );

    let xml = std::fs::read_to_string(&feed_path).unwrap();
    assert!(!xml.contains("cucumber.ghost.io"));
    assert!(xml.contains("https://cucumber.io/blog/new-release/"));
    assert!(xml.contains("https://cucumber.io/content/images/cover.png"));

    let feed = RssFeedView::parse(&xml).unwrap();
    assert_eq!(
        feed.generator().unwrap().as_deref(),
        Some("Ghost 5.75 & Cucumber")
    );
}

#[tokio::test]
async fn test_rss_skipped_when_canonical_is_current() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_last_modified(&server, "/ghost/rss/", "Fri, 01 Mar 2024 09:00:00 GMT").await;
    mount_last_modified(&server, "/blog/rss", "Fri, 01 Mar 2024 09:00:00 GMT").await;

    let r = reconciler(create_test_config(&server.uri(), out.path()));
    let outcome = r.run_rss().await.expect("RSS batch failed");

    assert!(matches!(outcome, RssOutcome::Skipped { .. }));
    assert!(!out.path().join("rss/rss.xml").exists());
}

#[tokio::test]
async fn test_rss_regenerated_when_canonical_has_no_header() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_last_modified(&server, "/ghost/rss/", "Fri, 01 Mar 2024 09:00:00 GMT").await;
    Mock::given(method("HEAD"))
        .and(path("/blog/rss"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    mount_get(&server, "/ghost/rss/", 200, FEED).await;

    let r = reconciler(create_test_config(&server.uri(), out.path()));
    let outcome = r.run_rss().await.expect("RSS batch failed");

    assert!(matches!(outcome, RssOutcome::Written { items: 2, .. }));
}
