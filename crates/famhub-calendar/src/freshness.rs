//! NEW-badge classification for posts and comments.

use chrono::{DateTime, TimeDelta, Utc};

/// Default rolling window for the NEW badge.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// True iff `created_at` is at most `window_hours` before `now`.
/// The boundary is inclusive.
pub fn is_fresh(created_at: DateTime<Utc>, now: DateTime<Utc>, window_hours: i64) -> bool {
    let window = TimeDelta::try_hours(window_hours).unwrap_or(if window_hours < 0 {
        TimeDelta::MIN
    } else {
        TimeDelta::MAX
    });
    now.signed_duration_since(created_at) <= window
}

/// A clock reading taken once per render pass, so every item in a batch is
/// judged against the same `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    now: DateTime<Utc>,
    window_hours: i64,
}

impl Freshness {
    /// Snapshot the current time.
    pub fn snapshot(window_hours: i64) -> Self {
        Self::at(Utc::now(), window_hours)
    }

    pub fn at(now: DateTime<Utc>, window_hours: i64) -> Self {
        Self { now, window_hours }
    }

    pub fn is_fresh(&self, created_at: DateTime<Utc>) -> bool {
        is_fresh(created_at, self.now, self.window_hours)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

impl Default for Freshness {
    fn default() -> Self {
        Self::snapshot(DEFAULT_WINDOW_HOURS)
    }
}
