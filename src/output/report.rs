//! Run reports
//!
//! The reconciler returns what it did instead of printing it; the binary
//! decides how to show it.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Summary of a sitemap reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapReport {
    /// Timestamp stamped on every entry this run touched
    pub started_at: String,

    /// Child locations judged stale, in detection order
    pub stale_children: Vec<String>,

    /// Stale children that could not be fetched
    pub skipped_children: Vec<String>,

    /// Files written for refreshed children
    pub written_children: Vec<PathBuf>,

    /// Parent index paths whose `lastmod` was updated
    pub updated_entries: Vec<String>,

    /// Locations appended to the parent index
    pub appended_entries: Vec<String>,

    /// Where the parent index was written, if it was
    pub parent_written: Option<PathBuf>,
}

impl SitemapReport {
    /// True when no child was stale and nothing was written
    pub fn is_up_to_date(&self) -> bool {
        self.stale_children.is_empty()
    }
}

/// What the RSS batch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RssOutcome {
    /// The published feed was already current
    Skipped {
        cms_modified: Option<DateTime<Utc>>,
        canonical_modified: Option<DateTime<Utc>>,
    },

    /// A regenerated feed was written
    Written { path: PathBuf, items: usize },
}

/// Prints a sitemap report to stdout
pub fn print_sitemap_report(report: &SitemapReport) {
    println!("=== Sitemap Reconciliation ===\n");

    if report.is_up_to_date() {
        println!("Nothing to update.");
        return;
    }

    println!("Overview:");
    println!("  Run timestamp: {}", report.started_at);
    println!("  Stale children: {}", report.stale_children.len());
    println!("  Children written: {}", report.written_children.len());
    println!("  Children skipped: {}", report.skipped_children.len());
    println!();

    if !report.written_children.is_empty() {
        println!("Written:");
        for path in &report.written_children {
            println!("  - {}", path.display());
        }
        println!();
    }

    if !report.skipped_children.is_empty() {
        println!("Skipped ({}):", report.skipped_children.len());
        for location in &report.skipped_children {
            println!("  - {}", location);
        }
        println!();
    }

    println!("Parent Index:");
    println!("  Entries updated: {}", report.updated_entries.len());
    println!("  Entries appended: {}", report.appended_entries.len());
    for location in &report.appended_entries {
        println!("    + {}", location);
    }
    match &report.parent_written {
        Some(path) => println!("  Written to: {}", path.display()),
        None => println!("  Not written"),
    }
    println!();
}

/// Prints the outcome of the RSS batch to stdout
pub fn print_rss_outcome(outcome: &RssOutcome) {
    println!("=== RSS Feed ===\n");

    let describe = |time: &Option<DateTime<Utc>>| {
        time.map(|t| t.to_rfc2822())
            .unwrap_or_else(|| "no Last-Modified".to_string())
    };

    match outcome {
        RssOutcome::Skipped {
            cms_modified,
            canonical_modified,
        } => {
            println!("Feed is current, nothing written.");
            println!("  CMS feed: {}", describe(cms_modified));
            println!("  Canonical feed: {}", describe(canonical_modified));
        }
        RssOutcome::Written { path, items } => {
            println!("Feed regenerated with {} items.", items);
            println!("  Written to: {}", path.display());
        }
    }
    println!();
}
