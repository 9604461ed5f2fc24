//! Run clock
//!
//! A run reads the clock once and stamps everything it writes with that
//! instant, so the pages map and the parent index agree with each other.

use chrono::{DateTime, SecondsFormat, Utc};

/// The instant a reconciliation run started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunClock {
    started_at: DateTime<Utc>,
}

impl RunClock {
    /// Starts a clock at the current time
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Starts a clock at a fixed instant
    pub fn at(started_at: DateTime<Utc>) -> Self {
        Self { started_at }
    }

    /// The instant the run started
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The run's calendar date as `YYYY-MM-DD`, used for synthetic `lastmod` values
    pub fn today(&self) -> String {
        self.started_at.format("%Y-%m-%d").to_string()
    }

    /// The run's timestamp with millisecond precision, e.g. `2024-03-01T10:15:00.000Z`
    pub fn timestamp(&self) -> String {
        self.started_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
