use serde::Deserialize;

/// Main configuration structure for Sitemap-Sync
///
/// Every section is optional; missing keys fall back to the cucumber.io
/// deployment this tool was written for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub sites: SitesConfig,
    pub sanitize: SanitizeConfig,
    pub rss: RssConfig,
    pub output: OutputConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the client
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the client
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for contact about the client
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "sitemap-sync".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://cucumber.io".to_string(),
            contact_email: "support@cucumber.io".to_string(),
        }
    }
}

/// Locations of the indexes being reconciled
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SitesConfig {
    /// Scheme and host every published URL must point at
    #[serde(rename = "canonical-base")]
    pub canonical_base: String,

    /// Parent sitemap index maintained by the CMS
    #[serde(rename = "cms-index")]
    pub cms_index: String,

    /// Parent sitemap index currently published on the canonical site.
    /// May be a URL or a local file path.
    #[serde(rename = "canonical-index")]
    pub canonical_index: String,

    /// Pages child map currently published on the canonical site
    #[serde(rename = "canonical-pages")]
    pub canonical_pages: String,

    /// Third-party hosted sitemap that backs the pages child map
    #[serde(rename = "pages-mirror")]
    pub pages_mirror: String,

    /// Path of the pages child map within the canonical site
    #[serde(rename = "pages-map-path")]
    pub pages_map_path: String,

    /// Landing pages injected into the pages map, in insertion order
    #[serde(rename = "synthetic-pages")]
    pub synthetic_pages: Vec<String>,
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            canonical_base: "https://cucumber.io".to_string(),
            cms_index: "https://cucumber.ghost.io/sitemap.xml".to_string(),
            canonical_index: "https://cucumber.io/sitemap.xml".to_string(),
            canonical_pages: "https://cucumber.io/sitemap-pages.xml".to_string(),
            pages_mirror: "https://cucumber-website.squarespace.com/sitemap.xml".to_string(),
            pages_map_path: "/sitemap-pages.xml".to_string(),
            synthetic_pages: vec!["blog".to_string(), "docs".to_string()],
        }
    }
}

/// Text substitutions applied to fetched child sitemaps
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SanitizeConfig {
    /// Subdomain token removed wherever it appears
    #[serde(rename = "vendor-token")]
    pub vendor_token: String,

    /// Hosts whose `sitemap.xsl` stylesheet instruction is stripped
    #[serde(rename = "stylesheet-hosts")]
    pub stylesheet_hosts: Vec<String>,

    /// `(from, to)` host rewrites
    #[serde(rename = "host-rewrites")]
    pub host_rewrites: Vec<(String, String)>,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            vendor_token: ".ghost".to_string(),
            stylesheet_hosts: vec!["cucumber.io".to_string(), "cucumber.ghost.io".to_string()],
            host_rewrites: vec![(
                "cucumber-website.squarespace.com".to_string(),
                "cucumber.io".to_string(),
            )],
        }
    }
}

/// RSS feed regeneration settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RssConfig {
    /// Feed published by the CMS
    #[serde(rename = "cms-feed")]
    pub cms_feed: String,

    /// Feed currently published on the canonical site
    #[serde(rename = "canonical-feed")]
    pub canonical_feed: String,

    /// Ordered `(from, to)` replacements applied to the feed body
    pub rewrites: Vec<(String, String)>,

    /// Text appended to the feed's generator element
    #[serde(rename = "generator-suffix")]
    pub generator_suffix: String,
}

impl Default for RssConfig {
    fn default() -> Self {
        let pair = |from: &str, to: &str| (from.to_string(), to.to_string());
        Self {
            cms_feed: "https://cucumber.ghost.io/rss/".to_string(),
            canonical_feed: "https://cucumber.io/blog/rss".to_string(),
            rewrites: vec![
                pair("cucumber.ghost.io/blog/", "cucumber.io/blog/"),
                pair("cucumber.ghost.io/", "cucumber.io/"),
                pair("cucumber.ghost.io/content/", "cucumber.io/content/"),
            ],
            generator_suffix: " & Cucumber".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory child sitemaps are written into, keyed by their URL path
    #[serde(rename = "sitemap-dir")]
    pub sitemap_dir: String,

    /// File the merged parent index is written to
    #[serde(rename = "parent-path")]
    pub parent_path: String,

    /// File the regenerated RSS feed is written to
    #[serde(rename = "rss-path")]
    pub rss_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sitemap_dir: "./static/sitemaps".to_string(),
            parent_path: "./static/sitemaps/sitemap.xml".to_string(),
            rss_path: "./static/rss/rss.xml".to_string(),
        }
    }
}
