//! Linear mapping of a bounded domain value onto an integer output range.

/// Map `value` from `[domain_min, domain_max]` onto `[range_start, range_end]`.
///
/// Values at or below `domain_min` are treated as `domain_min + 1`, so anything
/// that reaches the mapper still gets a non-zero offset. Values at or above
/// `domain_max` saturate to exactly `range_end`. Results are floored.
///
/// # Panics
///
/// Panics if `domain_max <= domain_min`; callers must never pass equal or
/// inverted bounds.
///
/// # Examples
///
/// ```
/// use raceslots::algorithms::map_range;
///
/// assert_eq!(map_range(0, 100, 0, 10, 5), 50);
/// assert_eq!(map_range(0, 100, 0, 10, 42), 100);
/// assert_eq!(map_range(0, 100, 0, 10, -3), 10);
/// ```
pub fn map_range(range_start: i64, range_end: i64, domain_min: i64, domain_max: i64, value: i64) -> i64 {
    assert!(
        domain_max > domain_min,
        "map_range requires domain_max > domain_min (got {}..{})",
        domain_min,
        domain_max
    );

    let value = if value <= domain_min {
        domain_min + 1
    } else {
        value
    };
    if value >= domain_max {
        return range_end;
    }

    // div_euclid floors for a positive divisor, including descending ranges.
    let offset = (value - domain_min) * (range_end - range_start);
    range_start + offset.div_euclid(domain_max - domain_min)
}
