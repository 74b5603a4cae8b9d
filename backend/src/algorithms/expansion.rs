//! Expansion of a schedule descriptor into concrete slot instants.

use chrono::{DateTime, Days, Duration, Timelike, Utc};

use crate::error::ScheduleResult;
use crate::models::{ScheduleDescriptor, Timeslot, Window};

/// Smallest slot instant strictly after `t`.
pub fn next_after(descriptor: &ScheduleDescriptor, t: DateTime<Utc>) -> DateTime<Utc> {
    let mut day = t.date_naive();
    loop {
        let found = descriptor
            .hours()
            .filter_map(|hour| day.and_hms_opt(hour, descriptor.minute(), 0))
            .map(|naive| naive.and_utc())
            .find(|candidate| *candidate > t);
        if let Some(instant) = found {
            return instant;
        }
        // Every day carries at least one slot, so this runs at most once.
        day = day + Days::new(1);
    }
}

/// Smallest slot instant at or after `t`.
pub fn next_at_or_after(descriptor: &ScheduleDescriptor, t: DateTime<Utc>) -> DateTime<Utc> {
    if is_slot(descriptor, t) {
        t
    } else {
        next_after(descriptor, t)
    }
}

/// Whether `t` is exactly a slot instant of the descriptor.
pub fn is_slot(descriptor: &ScheduleDescriptor, t: DateTime<Utc>) -> bool {
    t.second() == 0
        && t.nanosecond() == 0
        && t.minute() == descriptor.minute()
        && descriptor.hours().any(|hour| hour == t.hour())
}

/// Ordered slot instants covering one window starting at `anchor`.
///
/// The cursor is seeded one minute before the anchor so a slot sitting exactly
/// on the anchor is kept. Iteration stops before the first slot strictly after
/// the far edge rather than after a fixed count, so a slot landing exactly on
/// the edge is part of the output (and also opens the next window).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use raceslots::algorithms::expand;
/// use raceslots::models::{ScheduleDescriptor, Window};
///
/// let descriptor = ScheduleDescriptor::new(30, 14, 4).unwrap();
/// let anchor = Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap();
/// let slots = expand(&descriptor, anchor, Window::Day);
/// assert_eq!(slots.len(), 3);
/// ```
pub fn expand(descriptor: &ScheduleDescriptor, anchor: DateTime<Utc>, window: Window) -> Vec<DateTime<Utc>> {
    let end = next_after(descriptor, anchor + window.duration());
    let mut cursor = next_after(descriptor, anchor - Duration::minutes(1));

    let mut slots = Vec::with_capacity(descriptor.slots_per_day() * 7 + 1);
    while cursor < end {
        slots.push(cursor);
        cursor = next_after(descriptor, cursor);
    }
    slots
}

/// Expand a persisted descriptor string.
///
/// # Errors
///
/// [`crate::error::ScheduleError::ScheduleExpansion`] if the text is malformed.
pub fn expand_persisted(descriptor: &str, anchor: DateTime<Utc>, window: Window) -> ScheduleResult<Vec<DateTime<Utc>>> {
    let descriptor: ScheduleDescriptor = descriptor.parse()?;
    Ok(expand(&descriptor, anchor, window))
}

/// Expand and project each instant onto its weekly timeslot.
pub fn expand_timeslots(descriptor: &ScheduleDescriptor, anchor: DateTime<Utc>, window: Window) -> Vec<(DateTime<Utc>, Timeslot)> {
    expand(descriptor, anchor, window)
        .into_iter()
        .map(|instant| (instant, Timeslot::of(instant)))
        .collect()
}
