//! Repository calls wrapped with operation context and logging.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::repository::{RaceRepository, RepositoryResult};
use crate::models::{RaceEvent, ScheduleDescriptor, Season, SeasonId};

pub async fn health_check<R: RaceRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    let healthy = repo.health_check().await.map_err(|e| e.with_operation("health_check"))?;
    if !healthy {
        warn!("repository health check failed");
    }
    Ok(healthy)
}

pub async fn list_seasons<R: RaceRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Season>> {
    repo.list_seasons().await.map_err(|e| e.with_operation("list_seasons"))
}

pub async fn get_season<R: RaceRepository + ?Sized>(repo: &R, season_id: SeasonId) -> RepositoryResult<Season> {
    repo.get_season(season_id)
        .await
        .map_err(|e| e.with_operation("get_season"))
}

pub async fn store_season<R: RaceRepository + ?Sized>(repo: &R, season: &Season) -> RepositoryResult<()> {
    repo.store_season(season)
        .await
        .map_err(|e| e.with_operation("store_season"))?;
    info!(season = %season.id, name = %season.name, "season stored");
    Ok(())
}

/// Store events and log how many were accepted.
pub async fn store_events<R: RaceRepository + ?Sized>(
    repo: &R,
    season_id: SeasonId,
    events: &[RaceEvent],
) -> RepositoryResult<usize> {
    let stored = repo
        .store_events(season_id, events)
        .await
        .map_err(|e| e.with_operation("store_events"))?;
    debug!(season = %season_id, stored, "events stored");
    Ok(stored)
}

pub async fn events_for_period<R: RaceRepository + ?Sized>(
    repo: &R,
    season_id: SeasonId,
    period: u32,
) -> RepositoryResult<Vec<RaceEvent>> {
    repo.events_for_period(season_id, period)
        .await
        .map_err(|e| e.with_operation("events_for_period"))
}

pub async fn events_for_season<R: RaceRepository + ?Sized>(
    repo: &R,
    season_id: SeasonId,
) -> RepositoryResult<Vec<Vec<RaceEvent>>> {
    let periods = repo
        .events_for_season(season_id)
        .await
        .map_err(|e| e.with_operation("events_for_season"))?;
    debug!(season = %season_id, periods = periods.len(), "season events loaded");
    Ok(periods)
}

/// Start instants of every event in a season, across all weeks.
pub async fn season_event_starts<R: RaceRepository + ?Sized>(
    repo: &R,
    season_id: SeasonId,
) -> RepositoryResult<Vec<DateTime<Utc>>> {
    let periods = events_for_season(repo, season_id).await?;
    Ok(periods.iter().flatten().map(|e| e.start).collect())
}

pub async fn store_schedule<R: RaceRepository + ?Sized>(
    repo: &R,
    season_id: SeasonId,
    descriptor: ScheduleDescriptor,
) -> RepositoryResult<()> {
    repo.store_schedule(season_id, descriptor)
        .await
        .map_err(|e| e.with_operation("store_schedule"))?;
    info!(season = %season_id, schedule = %descriptor, "schedule descriptor stored");
    Ok(())
}
