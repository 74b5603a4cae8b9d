//! Heatmap grid assembly.
//!
//! A heatmap is one cell per scheduled timeslot of a week. Cells carry the
//! bound aggregate and an intensity derived from field strength, scaled
//! across the strongest and weakest matched cell of the same grid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{HeatmapError, HeatmapResult};
use crate::algorithms::{aggregate_season, bind, expand_timeslots, map_range, matching};
use crate::config::HeatmapSettings;
use crate::models::{AggregateRecord, OfficialMerge, RaceEvent, Season, SeasonId, Timeslot, Window};

/// Output range for cell intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityRange {
    pub floor: i64,
    pub ceiling: i64,
}

impl Default for IntensityRange {
    fn default() -> Self {
        HeatmapSettings::default().into()
    }
}

impl From<HeatmapSettings> for IntensityRange {
    fn from(settings: HeatmapSettings) -> Self {
        Self {
            floor: settings.intensity_floor,
            ceiling: settings.intensity_ceiling,
        }
    }
}

/// One timeslot of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub instant: DateTime<Utc>,
    pub slot: Timeslot,
    pub official: bool,
    pub field_size: u32,
    pub field_strength: u32,
    /// Whether any session was bound to this slot.
    pub matched: bool,
    /// 0 for unmatched cells, otherwise within the configured range.
    pub intensity: i64,
}

/// A complete grid, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapData {
    pub season_id: SeasonId,
    /// Week index, `None` for season averages.
    pub week: Option<u32>,
    pub cells: Vec<HeatmapCell>,
    /// Weakest matched field strength, 0 when nothing matched.
    pub strength_min: u32,
    /// Strongest matched field strength, 0 when nothing matched.
    pub strength_max: u32,
}

impl HeatmapData {
    pub fn matched_cells(&self) -> impl Iterator<Item = &HeatmapCell> {
        self.cells.iter().filter(|c| c.matched)
    }
}

/// Build the grid of one week of a season from that week's events.
pub fn build_week_heatmap(
    season: &Season,
    week: u32,
    events: &[RaceEvent],
    merge: OfficialMerge,
    range: IntensityRange,
) -> HeatmapResult<HeatmapData> {
    let descriptor = season.schedule.ok_or(HeatmapError::ScheduleMissing(season.id))?;
    let anchor = week_anchor(season, week)?;

    let rows = expand_timeslots(&descriptor, anchor, Window::Week)
        .into_iter()
        .map(|(instant, slot)| {
            let matched = matching(slot, events).next().is_some();
            (instant, slot, bind(slot, events, merge), matched)
        })
        .collect();

    Ok(assemble(season.id, Some(week), rows, range))
}

/// Start instant of `week`, rejecting indexes past the season's range.
pub fn week_anchor(season: &Season, week: u32) -> HeatmapResult<DateTime<Utc>> {
    season.period_start(week).ok_or(HeatmapError::WeekOutOfRange {
        season: season.id,
        week,
    })
}

/// Build the season-average grid from per-week event lists.
pub fn build_season_heatmap(
    season: &Season,
    periods: &[Vec<RaceEvent>],
    merge: OfficialMerge,
    range: IntensityRange,
) -> HeatmapResult<HeatmapData> {
    let descriptor = season.schedule.ok_or(HeatmapError::ScheduleMissing(season.id))?;

    let rows = aggregate_season(&descriptor, season.start, periods, merge)
        .into_iter()
        .map(|agg| (agg.instant, agg.slot, agg.record, !agg.record.is_empty()))
        .collect();

    Ok(assemble(season.id, None, rows, range))
}

fn assemble(
    season_id: SeasonId,
    week: Option<u32>,
    rows: Vec<(DateTime<Utc>, Timeslot, AggregateRecord, bool)>,
    range: IntensityRange,
) -> HeatmapData {
    let strengths = rows.iter().filter(|r| r.3).map(|r| r.2.field_strength);
    let strength_min = strengths.clone().min().unwrap_or(0);
    let strength_max = strengths.max().unwrap_or(0);

    let cells = rows
        .into_iter()
        .map(|(instant, slot, record, matched)| HeatmapCell {
            instant,
            slot,
            official: record.official,
            field_size: record.field_size,
            field_strength: record.field_strength,
            matched,
            intensity: intensity(matched, record.field_strength, strength_min, strength_max, range),
        })
        .collect();

    HeatmapData {
        season_id,
        week,
        cells,
        strength_min,
        strength_max,
    }
}

fn intensity(matched: bool, strength: u32, min: u32, max: u32, range: IntensityRange) -> i64 {
    if !matched {
        return 0;
    }
    // map_range needs a non-empty domain.
    if max <= min {
        return range.ceiling;
    }
    map_range(range.floor, range.ceiling, i64::from(min), i64::from(max), i64::from(strength))
}
