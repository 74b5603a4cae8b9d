//! Seasonal averaging of per-period slot aggregates.
//!
//! Each period (racing week) is first collapsed so split sessions sharing a
//! session key count once. Every canonical slot of a representative week is
//! then bound against each period, and the per-period results are averaged
//! over the periods that had any match.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::binding::{bind, matching};
use super::expansion::expand_timeslots;
use crate::error::ScheduleResult;
use crate::models::{AggregateRecord, OfficialMerge, RaceEvent, ScheduleDescriptor, SlotAggregate, Window};

/// Collapse split sessions of one period by session key.
///
/// The merged session keeps the start of the first split seen, sums field
/// sizes and keeps the strongest field. Output preserves first-seen order.
pub fn merge_splits(events: &[RaceEvent], merge: OfficialMerge) -> Vec<RaceEvent> {
    let mut merged: Vec<RaceEvent> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for event in events {
        match index.get(event.session_key.as_str()) {
            Some(&i) => {
                let session = &mut merged[i];
                session.official = merge.fold(session.official, event.official);
                session.field_size = session.field_size.saturating_add(event.field_size);
                session.field_strength = session.field_strength.max(event.field_strength);
            }
            None => {
                index.insert(event.session_key.as_str(), merged.len());
                merged.push(event.clone());
            }
        }
    }

    merged
}

/// Average every slot of a representative week across many periods.
///
/// `anchor` is the start of the representative week (usually the season start)
/// and only fixes the instant reported for each slot; matching is by weekday,
/// hour and minute. For each slot, field size and strength are summed over
/// the periods with a match and divided (truncating) by the number of such
/// periods. A slot no period matched stays at zero. `official` is set when any
/// contributing session in any period was official under `merge`.
pub fn aggregate_season(
    descriptor: &ScheduleDescriptor,
    anchor: DateTime<Utc>,
    periods: &[Vec<RaceEvent>],
    merge: OfficialMerge,
) -> Vec<SlotAggregate> {
    let sessions: Vec<Vec<RaceEvent>> = periods
        .iter()
        .map(|events| merge_splits(events, merge))
        .collect();

    // A slot on the far edge of the week repeats the first weekly slot.
    let mut seen = HashSet::new();
    let mut result: Vec<SlotAggregate> = expand_timeslots(descriptor, anchor, Window::Week)
        .into_iter()
        .filter(|(_, slot)| seen.insert(*slot))
        .map(|(instant, slot)| {
            let mut size_sum: u64 = 0;
            let mut strength_sum: u64 = 0;
            let mut official = false;
            let mut found: u64 = 0;

            for period in &sessions {
                let mut hits = matching(slot, period).peekable();
                if hits.peek().is_none() {
                    continue;
                }
                let record = bind(slot, hits, merge);
                size_sum += u64::from(record.field_size);
                strength_sum += u64::from(record.field_strength);
                official |= record.official;
                found += 1;
            }

            let record = if found == 0 {
                AggregateRecord::default()
            } else {
                AggregateRecord {
                    official,
                    field_size: average(size_sum, found),
                    field_strength: average(strength_sum, found),
                }
            };

            SlotAggregate {
                instant,
                slot,
                record,
            }
        })
        .collect();

    result.sort_by_key(|aggregate| aggregate.instant);

    debug!(
        periods = periods.len(),
        slots = result.len(),
        "aggregated season"
    );
    result
}

/// [`aggregate_season`] over a persisted descriptor string.
///
/// # Errors
///
/// [`crate::error::ScheduleError::ScheduleExpansion`] if the descriptor is
/// malformed; this aborts the whole aggregation.
pub fn aggregate_season_persisted(
    descriptor: &str,
    anchor: DateTime<Utc>,
    periods: &[Vec<RaceEvent>],
    merge: OfficialMerge,
) -> ScheduleResult<Vec<SlotAggregate>> {
    let descriptor: ScheduleDescriptor = descriptor.parse()?;
    Ok(aggregate_season(&descriptor, anchor, periods, merge))
}

fn average(sum: u64, count: u64) -> u32 {
    u32::try_from(sum / count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::models::Timeslot;
    use chrono::{Duration, TimeZone, Weekday};
    use proptest::prelude::*;

    fn season_start() -> DateTime<Utc> {
        // Tuesday
        Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap()
    }

    fn race(week: i64, day: i64, hour: i64, official: bool, size: u32, strength: u32, key: &str) -> RaceEvent {
        let start = season_start() + Duration::weeks(week) + Duration::days(day) + Duration::hours(hour) + Duration::minutes(30);
        RaceEvent::new(start, official, size, strength, key)
    }

    fn descriptor() -> ScheduleDescriptor {
        ScheduleDescriptor::new(30, 14, 4).unwrap()
    }

    fn slot_record(result: &[SlotAggregate], slot: Timeslot) -> AggregateRecord {
        result
            .iter()
            .find(|aggregate| aggregate.slot == slot)
            .map(|aggregate| aggregate.record)
            .unwrap()
    }

    #[test]
    fn test_merge_splits_by_session_key() {
        let events = vec![
            race(0, 0, 14, true, 20, 2500, "a"),
            race(0, 0, 14, false, 18, 1400, "a"),
            race(0, 0, 18, false, 9, 1100, "b"),
        ];

        let any = merge_splits(&events, OfficialMerge::Any);
        assert_eq!(any.len(), 2);
        assert_eq!(any[0].field_size, 38);
        assert_eq!(any[0].field_strength, 2500);
        assert!(any[0].official);
        assert_eq!(any[1].session_key, "b");

        let last = merge_splits(&events, OfficialMerge::LastWins);
        assert!(!last[0].official);
    }

    #[test]
    fn test_averages_over_matching_periods_only() {
        let periods = vec![
            vec![race(0, 0, 14, false, 10, 1000, "w0")],
            vec![race(1, 0, 14, true, 20, 2000, "w1")],
            vec![race(2, 1, 18, false, 30, 3000, "w2")],
        ];
        let result = aggregate_season(&descriptor(), season_start(), &periods, OfficialMerge::Any);
        assert_eq!(result.len(), 21);

        let tuesday = slot_record(&result, Timeslot::new(Weekday::Tue, 14, 30));
        assert_eq!(
            tuesday,
            AggregateRecord {
                official: true,
                field_size: 15,
                field_strength: 1500
            }
        );

        let wednesday = slot_record(&result, Timeslot::new(Weekday::Wed, 18, 30));
        assert_eq!(wednesday.field_size, 30);
        assert_eq!(wednesday.field_strength, 3000);
    }

    #[test]
    fn test_unmatched_slots_stay_zero() {
        let result = aggregate_season(&descriptor(), season_start(), &[vec![], vec![]], OfficialMerge::Any);
        assert!(result.iter().all(|aggregate| aggregate.record.is_empty()));
    }

    #[test]
    fn test_average_truncates() {
        let periods = vec![
            vec![race(0, 0, 14, false, 10, 1001, "a")],
            vec![race(1, 0, 14, false, 11, 1000, "b")],
        ];
        let result = aggregate_season(&descriptor(), season_start(), &periods, OfficialMerge::Any);
        let record = slot_record(&result, Timeslot::new(Weekday::Tue, 14, 30));
        assert_eq!(record.field_size, 10);
        assert_eq!(record.field_strength, 1000);
    }

    #[test]
    fn test_splits_merge_before_matching() {
        let periods = vec![vec![
            race(0, 0, 22, false, 25, 1800, "split"),
            race(0, 0, 22, false, 24, 1300, "split"),
        ]];
        let result = aggregate_season(&descriptor(), season_start(), &periods, OfficialMerge::Any);
        let record = slot_record(&result, Timeslot::new(Weekday::Tue, 22, 30));
        assert_eq!(record.field_size, 49);
        assert_eq!(record.field_strength, 1800);
    }

    #[test]
    fn test_edge_slot_counted_once() {
        let midnight = ScheduleDescriptor::new(0, 0, 8).unwrap();
        let periods = vec![vec![RaceEvent::new(season_start(), false, 10, 1200, "a")]];
        let result = aggregate_season(&midnight, season_start(), &periods, OfficialMerge::Any);
        assert_eq!(result.len(), 21);
        assert_eq!(result[0].instant, season_start());
        assert_eq!(result[0].record.field_strength, 1200);
    }

    #[test]
    fn test_result_sorted_by_instant() {
        let result = aggregate_season(&descriptor(), season_start(), &[], OfficialMerge::Any);
        assert!(result.windows(2).all(|pair| pair[0].instant < pair[1].instant));
    }

    #[test]
    fn test_malformed_descriptor_aborts() {
        let err = aggregate_season_persisted("every tuesday", season_start(), &[], OfficialMerge::Any).unwrap_err();
        assert!(matches!(err, ScheduleError::ScheduleExpansion { .. }));
    }

    proptest! {
        #[test]
        fn prop_average_strength_never_exceeds_max(
            entries in proptest::collection::vec((0i64..6, 0i64..7, 0usize..3, 0u32..60, 0u32..6000), 0..40),
        ) {
            let hours = [14i64, 18, 22];
            let mut periods: Vec<Vec<RaceEvent>> = vec![Vec::new(); 6];
            for (i, (week, day, hour, size, strength)) in entries.iter().enumerate() {
                periods[*week as usize].push(race(*week, *day, hours[*hour], i % 2 == 0, *size, *strength, &format!("k{}", i)));
            }

            let result = aggregate_season(&descriptor(), season_start(), &periods, OfficialMerge::Any);
            for aggregate in &result {
                let max_strength = periods
                    .iter()
                    .flatten()
                    .filter(|event| aggregate.slot.matches(event.start))
                    .map(|event| event.field_strength)
                    .max()
                    .unwrap_or(0);
                prop_assert!(aggregate.record.field_strength <= max_strength);
            }
        }
    }
}
