//! Reconciler - batch orchestration
//!
//! This module drives one reconciliation batch end to end:
//! - Loading the CMS and canonical indexes and the pages maps
//! - Deciding which children are stale
//! - Fetching, sanitizing and writing the refreshed children
//! - Merging the refreshed paths into the canonical parent index
//! - Regenerating the RSS feed when the CMS copy is newer
//!
//! Every fetch is awaited in turn; nothing here runs concurrently.

use crate::config::Config;
use crate::dates::RunClock;
use crate::document::{ChildMapView, SitemapIndexView};
use crate::output::{RssOutcome, SitemapReport};
use crate::source::DocumentSource;
use crate::storage::{child_output_path, Storage};
use crate::sync::augmenter::PageAugmenter;
use crate::sync::merger::merge_parent;
use crate::sync::rss::{finalize_feed, should_regenerate};
use crate::sync::sanitizer::{RssRewriter, Sanitizer};
use crate::sync::staleness::{find_stale_children, pages_map_needs_refresh};
use crate::url::url_path;
use crate::{Result, SyncError, UrlError};
use std::path::{Path, PathBuf};
use url::Url;

/// A refreshed child ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedChild {
    /// Path of the child within the canonical site
    pub path: String,
    pub contents: String,
}

/// Main reconciliation coordinator
pub struct Reconciler<S, W> {
    config: Config,
    source: S,
    storage: W,
    canonical_base: Url,
    sanitizer: Sanitizer,
    rss_rewriter: RssRewriter,
    augmenter: PageAugmenter,
}

impl<S: DocumentSource, W: Storage> Reconciler<S, W> {
    /// Creates a new reconciler
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `source` - Where indexes, children and feeds are read from
    /// * `storage` - Where finished documents are written to
    ///
    /// # Returns
    ///
    /// * `Ok(Reconciler)` - Ready to run
    /// * `Err(SyncError)` - The canonical base or a sanitizer rule is unusable
    pub fn new(config: Config, source: S, storage: W) -> Result<Self> {
        let canonical_base =
            Url::parse(&config.sites.canonical_base).map_err(|source| UrlError::Parse {
                url: config.sites.canonical_base.clone(),
                source,
            })?;
        let sanitizer = Sanitizer::new(&config.sanitize)?;
        let rss_rewriter = RssRewriter::new(&config.rss.rewrites);
        let augmenter = PageAugmenter::new(&config.sites)?;

        Ok(Self {
            config,
            source,
            storage,
            canonical_base,
            sanitizer,
            rss_rewriter,
            augmenter,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the sitemap batch
    ///
    /// 1. Loads the CMS index, canonical index, canonical pages map and mirror
    /// 2. Collects stale children, adding the mirror when the pages map drifted
    /// 3. Fetches, sanitizes and writes each stale child, skipping failures
    /// 4. Merges the written paths into the canonical index and writes it
    ///
    /// Nothing is written when no child is stale.
    pub async fn run_sitemaps(&self, clock: &RunClock) -> Result<SitemapReport> {
        let sites = &self.config.sites;
        tracing::info!("Starting sitemap reconciliation at {}", clock.timestamp());

        let cms_index = self.load_index(&sites.cms_index).await?;
        let canonical_index = self.load_index(&sites.canonical_index).await?;
        let canonical_pages = self.load_child_map(&sites.canonical_pages).await?;
        let mirror = self.load_child_map(&sites.pages_mirror).await?;

        let mut stale = find_stale_children(&cms_index, &canonical_index, &sites.pages_map_path)?;
        if pages_map_needs_refresh(
            &canonical_pages,
            &mirror,
            &self.augmenter.synthetic_locations(),
        )? {
            tracing::info!(
                "Pages map differs from {}, scheduling refresh",
                sites.pages_mirror
            );
            if !stale.contains(&sites.pages_mirror) {
                stale.push(sites.pages_mirror.clone());
            }
        }

        let mut report = SitemapReport {
            started_at: clock.timestamp(),
            stale_children: stale.clone(),
            ..Default::default()
        };

        if stale.is_empty() {
            tracing::info!("nothing to update");
            return Ok(report);
        }

        tracing::info!("{} stale children", stale.len());

        let sitemap_dir = Path::new(&self.config.output.sitemap_dir);
        let mut refreshed = Vec::new();

        for location in &stale {
            let Some(body) = self.fetch_child(location).await else {
                report.skipped_children.push(location.clone());
                continue;
            };

            let child = self.prepare_child(location, &body, clock)?;
            let file = child_output_path(sitemap_dir, &child.path)?;
            self.storage.write(&child.contents, &file)?;

            tracing::info!("Refreshed {} -> {}", location, file.display());
            report.written_children.push(file);
            refreshed.push(child.path);
        }

        let merged = merge_parent(
            &canonical_index,
            &refreshed,
            &clock.timestamp(),
            &self.canonical_base,
        )?;
        let parent_xml = merged
            .index
            .to_xml()
            .map_err(|e| SyncError::document(&self.config.output.parent_path, e))?;

        let parent_path = PathBuf::from(&self.config.output.parent_path);
        self.storage.write(&parent_xml, &parent_path)?;

        tracing::info!(
            "Parent index written to {} ({} updated, {} appended)",
            parent_path.display(),
            merged.updated.len(),
            merged.appended.len()
        );

        report.updated_entries = merged.updated;
        report.appended_entries = merged.appended;
        report.parent_written = Some(parent_path);

        Ok(report)
    }

    /// Runs the RSS batch
    ///
    /// The CMS feed is only fetched when its `Last-Modified` is newer than
    /// the canonical feed's.
    pub async fn run_rss(&self) -> Result<RssOutcome> {
        let rss = &self.config.rss;

        let cms_modified = self.source.last_modified(&rss.cms_feed).await?;
        let canonical_modified = self.source.last_modified(&rss.canonical_feed).await?;

        if !should_regenerate(cms_modified, canonical_modified) {
            tracing::info!("RSS feed is current, skipping");
            return Ok(RssOutcome::Skipped {
                cms_modified,
                canonical_modified,
            });
        }

        let body = self.source.load(&rss.cms_feed).await?;
        let feed = finalize_feed(&body, &self.rss_rewriter, &rss.generator_suffix)
            .map_err(|e| SyncError::document(&rss.cms_feed, e))?;

        let path = PathBuf::from(&self.config.output.rss_path);
        self.storage.write(&feed.xml, &path)?;

        tracing::info!(
            "RSS feed regenerated with {} items -> {}",
            feed.items,
            path.display()
        );

        Ok(RssOutcome::Written {
            path,
            items: feed.items,
        })
    }

    /// Sanitizes a fetched child and works out where it belongs
    ///
    /// The pages mirror is augmented and always lands on the pages map path;
    /// every other child keeps its own URL path.
    pub fn prepare_child(&self, location: &str, body: &str, clock: &RunClock) -> Result<PreparedChild> {
        let sanitized = self.sanitizer.sanitize(body);

        if self.augmenter.applies_to(location) {
            let contents = self
                .augmenter
                .augment(&sanitized, &clock.today())
                .map_err(|e| SyncError::document(location, e))?;
            return Ok(PreparedChild {
                path: self.config.sites.pages_map_path.clone(),
                contents,
            });
        }

        Ok(PreparedChild {
            path: url_path(location)?,
            contents: sanitized,
        })
    }

    async fn load_index(&self, location: &str) -> Result<SitemapIndexView> {
        let body = self.source.load(location).await?;
        tracing::debug!("Loaded index {} ({} bytes)", location, body.len());
        SitemapIndexView::parse(&body).map_err(|e| SyncError::document(location, e))
    }

    async fn load_child_map(&self, location: &str) -> Result<ChildMapView> {
        let body = self.source.load(location).await?;
        tracing::debug!("Loaded child map {} ({} bytes)", location, body.len());
        ChildMapView::parse(&body).map_err(|e| SyncError::document(location, e))
    }

    /// Fetches a stale child, `None` when it cannot be used this run
    async fn fetch_child(&self, location: &str) -> Option<String> {
        match self.source.fetch(location).await {
            Ok(fetched) if fetched.is_success() => Some(fetched.body),
            Ok(fetched) => {
                tracing::warn!("Skipping {}: status {}", location, fetched.status);
                None
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", location, e);
                None
            }
        }
    }
}
