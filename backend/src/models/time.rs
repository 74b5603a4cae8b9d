use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Length of the window a schedule is expanded over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Day,
    Week,
}

impl Window {
    pub fn duration(&self) -> Duration {
        match self {
            Window::Day => Duration::days(1),
            Window::Week => Duration::weeks(1),
        }
    }
}

/// A recurring `(weekday, hour, minute)` point of a weekly schedule.
///
/// Calendar date is deliberately absent: two instants on different weeks with
/// the same projection are the same timeslot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timeslot {
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
}

impl Timeslot {
    pub fn new(weekday: Weekday, hour: u32, minute: u32) -> Self {
        Self {
            weekday,
            hour,
            minute,
        }
    }

    /// UTC projection of an instant.
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self {
            weekday: instant.weekday(),
            hour: instant.hour(),
            minute: instant.minute(),
        }
    }

    pub fn matches(&self, instant: DateTime<Utc>) -> bool {
        Self::of(instant) == *self
    }
}

impl From<DateTime<Utc>> for Timeslot {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::of(instant)
    }
}

impl std::fmt::Display for Timeslot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:02}:{:02}", self.weekday, self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timeslot_ignores_calendar_date() {
        let tuesday = Utc.with_ymd_and_hms(2024, 3, 12, 14, 30, 0).unwrap();
        let next_tuesday = tuesday + Duration::weeks(1);
        let slot = Timeslot::of(tuesday);

        assert_eq!(slot, Timeslot::new(Weekday::Tue, 14, 30));
        assert!(slot.matches(next_tuesday));
        assert!(!slot.matches(tuesday + Duration::days(1)));
    }

    #[test]
    fn test_timeslot_ignores_seconds() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 12, 14, 30, 59).unwrap();
        assert!(Timeslot::new(Weekday::Tue, 14, 30).matches(instant));
    }

    #[test]
    fn test_window_duration() {
        assert_eq!(Window::Day.duration(), Duration::hours(24));
        assert_eq!(Window::Week.duration(), Duration::days(7));
    }

    #[test]
    fn test_display() {
        assert_eq!(Timeslot::new(Weekday::Sat, 9, 5).to_string(), "Sat 09:05");
    }
}
