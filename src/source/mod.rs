//! Document source module
//!
//! Everything the sync engine reads comes through a `DocumentSource`:
//! remote sitemaps and feeds over HTTP, or local files for indexes that
//! are already on disk.

mod fetcher;
mod traits;

pub use fetcher::{build_http_client, user_agent, HttpSource};
pub use traits::{DocumentSource, FetchedDocument, SourceError, SourceResult};
