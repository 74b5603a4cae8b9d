//! Schedule bootstrap for seasons.

use tracing::{debug, info, warn};

use super::error::HeatmapResult;
use crate::algorithms::infer_schedule;
use crate::db::{self, RaceRepository};
use crate::models::{ScheduleDescriptor, SeasonId};

/// Return the season's schedule descriptor, inferring and storing it on first
/// use.
///
/// A season whose descriptor is already known is returned unchanged; inference
/// runs at most once per season. Inference errors are returned as-is and
/// nothing is stored.
pub async fn ensure_season_schedule<R: RaceRepository + ?Sized>(
    repo: &R,
    season_id: SeasonId,
) -> HeatmapResult<ScheduleDescriptor> {
    let season = db::get_season(repo, season_id).await?;
    if let Some(descriptor) = season.schedule {
        debug!(season = %season_id, schedule = %descriptor, "schedule already known");
        return Ok(descriptor);
    }

    let starts = db::season_event_starts(repo, season_id).await?;
    let descriptor = infer_schedule(starts).map_err(|e| {
        warn!(season = %season_id, error = %e, "schedule inference failed");
        e
    })?;

    db::store_schedule(repo, season_id, descriptor).await?;
    info!(season = %season_id, schedule = %descriptor, "schedule inferred");
    Ok(descriptor)
}
