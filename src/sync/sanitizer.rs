//! Text sanitization for fetched documents
//!
//! Child sitemaps come back from the CMS and the pages mirror pointing at
//! their own hosts. The rules here are applied to the raw text, before any
//! parsing, so every location ends up on the canonical domain.

use crate::config::SanitizeConfig;
use crate::{ConfigError, Result};
use regex::Regex;

/// Rewrites child sitemap text onto the canonical domain
///
/// Rules, in order:
/// 1. every occurrence of the vendor token is removed
/// 2. `sitemap.xsl` stylesheet instructions for the listed hosts are removed
///    together with the whitespace after them
/// 3. host rewrites are applied as plain substring replacements
///
/// The rules are repeated until the text stops changing, so sanitizing
/// already-sanitized text is a no-op. Every host rewrite must shorten the
/// text it replaces, which makes each changing pass strictly shorter.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    vendor_token: String,
    stylesheets: Vec<Regex>,
    host_rewrites: Vec<(String, String)>,
}

impl Sanitizer {
    pub fn new(config: &SanitizeConfig) -> Result<Self> {
        let stylesheets = config
            .stylesheet_hosts
            .iter()
            .map(|host| Regex::new(&stylesheet_pattern(host)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if let Some((from, to)) = config
            .host_rewrites
            .iter()
            .find(|(from, to)| !from.is_empty() && to.len() >= from.len())
        {
            return Err(ConfigError::Validation(format!(
                "host rewrite '{}' -> '{}' must shorten the host",
                from, to
            ))
            .into());
        }

        Ok(Self {
            vendor_token: config.vendor_token.clone(),
            stylesheets,
            host_rewrites: config.host_rewrites.clone(),
        })
    }

    /// Applies every rule until the text is stable
    pub fn sanitize(&self, input: &str) -> String {
        let mut current = self.apply_once(input);
        loop {
            let next = self.apply_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn apply_once(&self, input: &str) -> String {
        let mut text = if self.vendor_token.is_empty() {
            input.to_string()
        } else {
            input.replace(&self.vendor_token, "")
        };

        for stylesheet in &self.stylesheets {
            text = stylesheet.replace_all(&text, "").into_owned();
        }

        for (from, to) in &self.host_rewrites {
            if !from.is_empty() {
                text = text.replace(from.as_str(), to);
            }
        }

        text
    }
}

fn stylesheet_pattern(host: &str) -> String {
    format!(
        r#"<\?xml-stylesheet type="text/xsl" href="//{}/sitemap\.xsl"\?>\s*"#,
        regex::escape(host)
    )
}

/// Ordered plain-text replacements applied to the RSS feed body
///
/// Each pair runs over the whole output of the previous one, so the order of
/// the table matters: a broad rewrite listed first shadows narrower ones.
#[derive(Debug, Clone, Default)]
pub struct RssRewriter {
    rewrites: Vec<(String, String)>,
}

impl RssRewriter {
    pub fn new(rewrites: &[(String, String)]) -> Self {
        Self {
            rewrites: rewrites.to_vec(),
        }
    }

    pub fn rewrite(&self, input: &str) -> String {
        self.rewrites
            .iter()
            .filter(|(from, _)| !from.is_empty())
            .fold(input.to_string(), |text, (from, to)| text.replace(from.as_str(), to))
    }
}
