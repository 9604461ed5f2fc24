//! Output module for run reports
//!
//! This module handles:
//! - Describing what a sitemap reconciliation run changed
//! - Describing whether the RSS feed was regenerated
//! - Printing both for the command line

mod report;

pub use report::{print_rss_outcome, print_sitemap_report, RssOutcome, SitemapReport};
