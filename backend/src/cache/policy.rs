//! Staleness rules for cached artifacts.

use chrono::{DateTime, Duration, Utc};

use super::key::CacheEntry;

/// Artifacts younger than this are always served.
pub const DEFAULT_FRESH_FOR_MINUTES: i64 = 120;

/// A window older than this is closed: no more data will arrive for it.
pub const DEFAULT_CLOSED_AFTER_DAYS: i64 = 10;

/// Two-threshold validity rule for cached artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub fresh_for: Duration,
    pub closed_after: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            fresh_for: Duration::minutes(DEFAULT_FRESH_FOR_MINUTES),
            closed_after: Duration::days(DEFAULT_CLOSED_AFTER_DAYS),
        }
    }
}

impl CachePolicy {
    pub fn new(fresh_for: Duration, closed_after: Duration) -> Self {
        Self {
            fresh_for,
            closed_after,
        }
    }

    /// Decide whether a cached artifact can be served as-is.
    ///
    /// `entry` is `None` when either the metadata or the artifact bytes are
    /// missing. Rules, first match wins:
    ///
    /// 1. no entry: invalid
    /// 2. style differs from `requested_style`: invalid
    /// 3. updated less than `fresh_for` ago: valid
    /// 4. window started more than `closed_after` before `now` and the entry
    ///    was updated more than `closed_after` after the window start: valid
    /// 5. otherwise invalid
    pub fn is_valid(
        &self,
        entry: Option<&CacheEntry>,
        requested_style: &str,
        window_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(entry) = entry else {
            return false;
        };
        if entry.style != requested_style {
            return false;
        }
        if now - entry.updated_at < self.fresh_for {
            return true;
        }
        now - window_start > self.closed_after && entry.updated_at - window_start > self.closed_after
    }
}
