mod support;

use chrono::{Datelike, Duration, Timelike, Weekday};
use proptest::prelude::*;
use raceslots::algorithms::{aggregate_season, bind, expand, expand_persisted, infer_schedule};
use raceslots::models::{OfficialMerge, ScheduleDescriptor, Timeslot, Window};
use raceslots::ScheduleError;

use support::{full_grid, season_start, session, GRID_HOURS, GRID_MINUTE};

#[test]
fn test_grid_round_trips_through_inference() {
    let events = full_grid(2);
    let descriptor = infer_schedule(events.iter().map(|e| e.start)).unwrap();

    assert_eq!(descriptor.minute(), GRID_MINUTE);
    assert_eq!(descriptor.starting_hour(), 2);
    assert_eq!(descriptor.hourly_interval(), 4);
    assert_eq!(descriptor.hours().collect::<Vec<_>>(), GRID_HOURS.to_vec());

    let week = expand(&descriptor, season_start(), Window::Week);
    assert_eq!(week.len(), 42);
    assert_eq!(week, events[..42].iter().map(|e| e.start).collect::<Vec<_>>());
}

#[test]
fn test_persisted_descriptor_expands_like_typed() {
    let descriptor = ScheduleDescriptor::new(30, 2, 4).unwrap();
    let stored = descriptor.to_string();
    assert_eq!(stored, "30 2/4 * * *");

    let from_text = expand_persisted(&stored, season_start(), Window::Day).unwrap();
    assert_eq!(from_text, expand(&descriptor, season_start(), Window::Day));
}

#[test]
fn test_malformed_descriptors_rejected() {
    for text in ["", "30 2/4", "61 2/4 * * *", "30 25/4 * * *", "30 2/0 * * *", "x 2/4 * * *", "30 2/4 1 * *"] {
        let err = expand_persisted(text, season_start(), Window::Day).unwrap_err();
        assert!(
            matches!(err, ScheduleError::ScheduleExpansion { .. }),
            "{:?} gave {:?}",
            text,
            err
        );
    }
}

#[test]
fn test_split_sessions_bind_into_one_slot() {
    let mut events = vec![session(0, 14, false, 10, 900), session(0, 14, true, 12, 1200)];
    events[1].session_key = events[0].session_key.clone();
    let slot = Timeslot::new(Weekday::Tue, 14, 30);

    let record = bind(slot, &events, OfficialMerge::Any);
    assert_eq!(record.field_size, 22);
    assert_eq!(record.field_strength, 1200);
    assert!(record.official);
}

#[test]
fn test_season_average_over_weeks() {
    let descriptor = ScheduleDescriptor::new(30, 2, 4).unwrap();
    let week0 = vec![session(0, 2, false, 10, 1000)];
    let week1 = vec![session(7, 2, true, 20, 2000)];
    let week2 = vec![session(15, 6, false, 5, 500)];

    let aggregates = aggregate_season(&descriptor, season_start(), &[week0, week1, week2], OfficialMerge::Any);
    assert_eq!(aggregates.len(), 42);

    let first = aggregates[0];
    assert_eq!(first.instant, season_start() + Duration::hours(2) + Duration::minutes(30));
    assert_eq!(first.record.field_size, 15);
    assert_eq!(first.record.field_strength, 1500);
    assert!(first.record.official);

    // Wednesday 06:30 only appears in week 2.
    let wed = aggregates
        .iter()
        .find(|a| a.slot == Timeslot::new(Weekday::Wed, 6, 30))
        .unwrap();
    assert_eq!(wed.record.field_strength, 500);
    assert_eq!(wed.instant.weekday(), Weekday::Wed);

    let empty = aggregates.iter().filter(|a| a.record.is_empty()).count();
    assert_eq!(empty, 40);
}

proptest! {
    #[test]
    fn prop_inferred_descriptor_covers_regular_grid(
        minute in 0u32..60,
        start in 0u32..24,
        interval in prop::sample::select(vec![1u32, 2, 3, 4, 6, 8, 12]),
        days in 2i64..5,
    ) {
        let descriptor = ScheduleDescriptor::new(minute, start, interval).unwrap();
        prop_assume!(descriptor.slots_per_day() >= 2);

        let anchor = season_start();
        let mut starts: Vec<_> = (0..days)
            .flat_map(|d| expand(&descriptor, anchor + Duration::days(d), Window::Day))
            .collect();
        starts.dedup();

        let inferred = infer_schedule(starts.clone()).unwrap();
        prop_assert_eq!(inferred.minute(), minute);
        prop_assert_eq!(inferred.hourly_interval(), interval);
        prop_assert_eq!(inferred.starting_hour(), start);
        for instant in starts {
            prop_assert_eq!(instant.minute(), minute);
        }
    }
}
