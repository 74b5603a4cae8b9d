//! Binding of race events to a single weekly timeslot.
//!
//! Matching uses the `(weekday, hour, minute)` projection of each start in UTC,
//! never the calendar date, because the race schedule repeats weekly.

use crate::models::{AggregateRecord, OfficialMerge, RaceEvent, Timeslot};

/// Reduce every event matching `slot` into one aggregate record.
///
/// Sizes are summed and the strongest field wins. With no match the result is
/// the zero record `{official: false, field_size: 0, field_strength: 0}`.
pub fn bind<'a, I>(slot: Timeslot, events: I, merge: OfficialMerge) -> AggregateRecord
where
    I: IntoIterator<Item = &'a RaceEvent>,
{
    events
        .into_iter()
        .filter(|event| slot.matches(event.start))
        .fold(AggregateRecord::default(), |acc, event| AggregateRecord {
            official: merge.fold(acc.official, event.official),
            field_size: acc.field_size.saturating_add(event.field_size),
            field_strength: acc.field_strength.max(event.field_strength),
        })
}

/// Events matching `slot`, in input order.
pub fn matching<'a>(slot: Timeslot, events: &'a [RaceEvent]) -> impl Iterator<Item = &'a RaceEvent> + 'a {
    events.iter().filter(move |event| slot.matches(event.start))
}
