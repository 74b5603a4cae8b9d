//! Race events and seasons as supplied by the storage layer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::schedule::ScheduleDescriptor;

/// Length of one racing period (a "week" of the season).
pub const PERIOD_LENGTH_DAYS: i64 = 7;

/// Number of periods a season may span. Period indexes run below this.
pub const MAX_PERIODS: u32 = 5_200;

/// Strongly-typed season identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonId(pub i64);

impl SeasonId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SeasonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One observed race session.
///
/// Immutable once ingested. `session_key` groups split sessions of the same
/// race start so they can be merged before slot matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceEvent {
    pub start: DateTime<Utc>,
    pub official: bool,
    pub field_size: u32,
    pub field_strength: u32,
    pub session_key: String,
}

impl RaceEvent {
    pub fn new(
        start: DateTime<Utc>,
        official: bool,
        field_size: u32,
        field_strength: u32,
        session_key: impl Into<String>,
    ) -> Self {
        Self {
            start,
            official,
            field_size,
            field_strength,
            session_key: session_key.into(),
        }
    }
}

/// A racing season: a start instant plus the inferred schedule, if known yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub schedule: Option<ScheduleDescriptor>,
}

impl Season {
    pub fn new(id: SeasonId, name: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            start,
            schedule: None,
        }
    }

    /// Start of the given period (week index, zero-based), or `None` past
    /// [`MAX_PERIODS`] or the representable time range.
    pub fn period_start(&self, period: u32) -> Option<DateTime<Utc>> {
        if period >= MAX_PERIODS {
            return None;
        }
        Duration::try_days(PERIOD_LENGTH_DAYS * i64::from(period))
            .and_then(|offset| self.start.checked_add_signed(offset))
    }

    /// Period index an instant falls into, or `None` before the season start.
    pub fn period_of(&self, instant: DateTime<Utc>) -> Option<u32> {
        if instant < self.start {
            return None;
        }
        let elapsed = instant - self.start;
        u32::try_from(elapsed.num_days() / PERIOD_LENGTH_DAYS).ok()
    }
}
