//! Reconciliation engine
//!
//! This module contains:
//! - Staleness detection between the CMS and canonical indexes
//! - Text sanitization of fetched children and the RSS feed
//! - Pages map augmentation with synthetic landing pages
//! - Parent index merging
//! - The `Reconciler` that runs a batch end to end

mod augmenter;
mod coordinator;
mod merger;
mod rss;
mod sanitizer;
mod staleness;

pub use augmenter::PageAugmenter;
pub use coordinator::{PreparedChild, Reconciler};
pub use merger::{merge_parent, MergeOutcome};
pub use rss::{finalize_feed, should_regenerate, FinalizedFeed};
pub use sanitizer::{RssRewriter, Sanitizer};
pub use staleness::{
    canonical_dates, find_stale_children, lastmods_by_path, pages_map_needs_refresh,
};
