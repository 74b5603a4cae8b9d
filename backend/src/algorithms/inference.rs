//! Recurring schedule inference from sparse event timestamps.
//!
//! Only sessions that actually ran are observed, so the schedule is rebuilt
//! from the smallest observed gap and the earliest observed hour rather than
//! assumed up front. This is a heuristic: the result is correct only if the
//! finest interval and the earliest slot of the true schedule both appear at
//! least once in the sample. A sample missing the earliest slot produces a
//! later starting hour; a sample that never shows two adjacent slots produces
//! a coarser interval.

use chrono::{DateTime, Timelike, Utc};
use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::ScheduleDescriptor;

/// Interval and starting-hour value used when no pair contributes one.
const HOUR_CEILING: u32 = 24;

/// Infer a schedule descriptor from event start instants.
///
/// The input may be in any order and may contain duplicates; it is sorted and
/// de-duplicated first, so repeated calls on the same set always agree.
///
/// # Errors
///
/// * [`ScheduleError::InsufficientData`] with fewer than two distinct instants.
/// * [`ScheduleError::IrregularSchedule`] when the two earliest instants do not
///   share a minute-of-hour.
pub fn infer_schedule<I>(starts: I) -> ScheduleResult<ScheduleDescriptor>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut starts: Vec<DateTime<Utc>> = starts.into_iter().collect();
    starts.sort_unstable();
    starts.dedup();

    if starts.len() < 2 {
        return Err(ScheduleError::InsufficientData {
            samples: starts.len(),
        });
    }

    // Only the leading pair is checked; later samples are trusted to follow it.
    let minute = starts[0].minute();
    if starts[1].minute() != minute {
        return Err(ScheduleError::IrregularSchedule {
            first: starts[0],
            second: starts[1],
        });
    }

    let mut hourly_interval = HOUR_CEILING;
    let mut starting_hour = HOUR_CEILING;
    for pair in starts.windows(2) {
        let delta = (pair[1] - pair[0]).num_hours();
        if delta > 0 {
            hourly_interval = hourly_interval.min(u32::try_from(delta).unwrap_or(HOUR_CEILING));
        }
        starting_hour = starting_hour.min(pair[0].hour());
    }

    debug!(
        samples = starts.len(),
        minute, starting_hour, hourly_interval, "inferred schedule"
    );

    ScheduleDescriptor::new(minute, starting_hour, hourly_interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_infers_two_hour_cadence() {
        let starts = vec![at(12, 6, 15), at(12, 8, 15), at(12, 14, 15), at(13, 2, 15), at(13, 4, 15)];
        let descriptor = infer_schedule(starts).unwrap();
        assert_eq!(descriptor, ScheduleDescriptor::new(15, 2, 2).unwrap());
    }

    #[test]
    fn test_earliest_hour_ignores_last_event() {
        // The final event sits at hour 0 but only earlier events contribute.
        let starts = vec![at(12, 14, 30), at(12, 18, 30), at(13, 0, 30)];
        let descriptor = infer_schedule(starts).unwrap();
        assert_eq!(descriptor.starting_hour(), 14);
        assert_eq!(descriptor.hourly_interval(), 4);
    }

    #[test]
    fn test_sparse_daily_events_cap_interval_at_24() {
        let starts = vec![at(12, 20, 0), at(14, 20, 0), at(19, 20, 0)];
        let descriptor = infer_schedule(starts).unwrap();
        assert_eq!(descriptor, ScheduleDescriptor::new(0, 20, 24).unwrap());
    }

    #[test]
    fn test_unsorted_input_with_duplicates() {
        let sorted = vec![at(12, 1, 45), at(12, 3, 45), at(12, 5, 45)];
        let shuffled = vec![at(12, 5, 45), at(12, 1, 45), at(12, 3, 45), at(12, 1, 45)];
        assert_eq!(infer_schedule(sorted).unwrap(), infer_schedule(shuffled).unwrap());
    }

    #[test]
    fn test_sub_hour_gaps_are_ignored() {
        // A 30-second gap truncates to zero whole hours and never sets the interval.
        let base = at(12, 10, 0);
        let starts = vec![base, base + Duration::seconds(30), base + Duration::hours(3)];
        assert_eq!(infer_schedule(starts).unwrap().hourly_interval(), 2);

        let starts = vec![
            base,
            base + Duration::hours(1) + Duration::seconds(20),
            base + Duration::hours(3),
        ];
        assert_eq!(infer_schedule(starts).unwrap().hourly_interval(), 1);
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(
            infer_schedule(Vec::new()).unwrap_err(),
            ScheduleError::InsufficientData { samples: 0 }
        );
        assert_eq!(
            infer_schedule(vec![at(12, 1, 0), at(12, 1, 0)]).unwrap_err(),
            ScheduleError::InsufficientData { samples: 1 }
        );
    }

    #[test]
    fn test_irregular_minutes() {
        let err = infer_schedule(vec![at(12, 1, 0), at(12, 3, 15)]).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::IrregularSchedule {
                first: at(12, 1, 0),
                second: at(12, 3, 15)
            }
        );
    }
}
