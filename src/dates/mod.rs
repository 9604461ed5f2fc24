//! Date handling for sitemap freshness
//!
//! Sitemap `lastmod` values are compared at day granularity, while HTTP
//! `Last-Modified` headers and the timestamps written into the parent index
//! keep full precision.

mod clock;

pub use clock::RunClock;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Errors raised while interpreting date text
#[derive(Debug, Error)]
pub enum DateError {
    #[error("Invalid lastmod value: '{0}'")]
    InvalidLastmod(String),

    #[error("Invalid Last-Modified header: '{0}'")]
    InvalidHttpDate(String),
}

/// Parses a sitemap `lastmod` value into the calendar date it names
///
/// Accepts full RFC 3339 timestamps, W3C datetimes without seconds, and
/// plain `YYYY-MM-DD` dates. The date is taken as written, in the value's
/// own offset, so `2024-03-01T23:30:00-05:00` is March 1st.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sitemap_sync::dates::parse_lastmod_date;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(parse_lastmod_date("2024-03-01").unwrap(), day);
/// assert_eq!(parse_lastmod_date("2024-03-01T10:15:00.000Z").unwrap(), day);
/// assert!(parse_lastmod_date("yesterday").is_err());
/// ```
pub fn parse_lastmod_date(text: &str) -> Result<NaiveDate, DateError> {
    let text = text.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.date_naive());
    }

    // W3C datetime allows dropping the seconds
    if let Ok(timestamp) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M%:z") {
        return Ok(timestamp.date_naive());
    }

    if let Some(minutes) = text.strip_suffix('Z') {
        let zulu = format!("{minutes}+00:00");
        if let Ok(timestamp) = DateTime::parse_from_str(&zulu, "%Y-%m-%dT%H:%M%:z") {
            return Ok(timestamp.date_naive());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| DateError::InvalidLastmod(text.to_string()))
}

/// Parses an HTTP `Last-Modified` header value
///
/// # Examples
///
/// ```
/// use sitemap_sync::dates::parse_http_date;
///
/// let parsed = parse_http_date("Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
/// assert_eq!(parsed.to_rfc3339(), "2015-10-21T07:28:00+00:00");
/// ```
pub fn parse_http_date(text: &str) -> Result<DateTime<Utc>, DateError> {
    DateTime::parse_from_rfc2822(text.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| DateError::InvalidHttpDate(text.to_string()))
}

/// The instant used for a missing `Last-Modified` header
///
/// Anything compares newer than this, so a feed without the header always
/// looks stale.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}
