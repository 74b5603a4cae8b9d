//! Error types for schedule inference and expansion.
//!
//! None of these errors are retried inside the crate. Callers decide whether a
//! failure skips one season's refresh or aborts the whole request.

use chrono::{DateTime, Utc};

/// Result type for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Errors raised while inferring or expanding a recurring race schedule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Fewer than two distinct event timestamps were available.
    ///
    /// Callers should keep any previously known descriptor.
    #[error("Insufficient data: need at least 2 distinct event timestamps, got {samples}")]
    InsufficientData { samples: usize },

    /// The earliest samples do not share a minute-of-hour, so the upstream data
    /// does not describe a fixed time-of-day slot.
    #[error("Irregular schedule: events at {first} and {second} do not share a minute-of-hour")]
    IrregularSchedule {
        first: DateTime<Utc>,
        second: DateTime<Utc>,
    },

    /// A persisted descriptor could not be parsed or is out of range.
    #[error("Schedule expansion error: descriptor '{descriptor}' is malformed ({reason})")]
    ScheduleExpansion { descriptor: String, reason: String },
}

impl ScheduleError {
    /// Create a schedule expansion error for the given descriptor text.
    pub fn expansion(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ScheduleExpansion {
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable code, used by the HTTP layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "INSUFFICIENT_DATA",
            Self::IrregularSchedule { .. } => "IRREGULAR_SCHEDULE",
            Self::ScheduleExpansion { .. } => "SCHEDULE_EXPANSION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = ScheduleError::InsufficientData { samples: 1 };
        assert!(err.to_string().contains("got 1"));
        assert_eq!(err.code(), "INSUFFICIENT_DATA");
    }

    #[test]
    fn test_expansion_constructor() {
        let err = ScheduleError::expansion("bogus", "expected 5 fields");
        match &err {
            ScheduleError::ScheduleExpansion { descriptor, reason } => {
                assert_eq!(descriptor, "bogus");
                assert_eq!(reason, "expected 5 fields");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.code(), "SCHEDULE_EXPANSION");
    }
}
