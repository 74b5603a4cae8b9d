//! In-memory local repository implementation.
//!
//! All data lives in memory behind a single lock, which keeps tests fast,
//! deterministic and isolated.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::repository::{ErrorContext, RaceRepository, RepositoryError, RepositoryResult};
use crate::models::{RaceEvent, ScheduleDescriptor, Season, SeasonId, MAX_PERIODS};

/// In-memory local repository.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use raceslots::db::{RaceRepository, LocalRepository};
/// use raceslots::models::{Season, SeasonId};
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = LocalRepository::new();
/// let start = Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap();
/// repo.store_season(&Season::new(SeasonId::new(1), "2024 S1", start)).await.unwrap();
/// assert_eq!(repo.list_seasons().await.unwrap().len(), 1);
/// # }
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    seasons: HashMap<SeasonId, Season>,
    events: HashMap<SeasonId, Vec<RaceEvent>>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            seasons: HashMap::new(),
            events: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Number of events stored for a season.
    pub fn event_count(&self, season_id: SeasonId) -> usize {
        self.data
            .read()
            .events
            .get(&season_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn ensure_healthy(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if data.is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection("local repository marked unhealthy").with_operation(operation))
        }
    }

    fn season<'a>(data: &'a LocalData, season_id: SeasonId, operation: &str) -> RepositoryResult<&'a Season> {
        data.seasons.get(&season_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("season {}", season_id),
                ErrorContext::new(operation)
                    .with_entity("season")
                    .with_entity_id(season_id),
            )
        })
    }
}

#[async_trait]
impl RaceRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn store_season(&self, season: &Season) -> RepositoryResult<()> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "store_season")?;
        data.seasons.insert(season.id, season.clone());
        Ok(())
    }

    async fn get_season(&self, season_id: SeasonId) -> RepositoryResult<Season> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "get_season")?;
        Self::season(&data, season_id, "get_season").cloned()
    }

    async fn list_seasons(&self) -> RepositoryResult<Vec<Season>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "list_seasons")?;
        let mut seasons: Vec<Season> = data.seasons.values().cloned().collect();
        seasons.sort_by_key(|s| (s.start, s.id));
        Ok(seasons)
    }

    async fn store_events(&self, season_id: SeasonId, events: &[RaceEvent]) -> RepositoryResult<usize> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "store_events")?;
        let season = Self::season(&data, season_id, "store_events")?;

        for event in events {
            let problem = match season.period_of(event.start) {
                None => format!("event at {} precedes season start {}", event.start, season.start),
                Some(period) if period >= MAX_PERIODS => {
                    format!("event at {} is more than {} weeks past season start", event.start, MAX_PERIODS)
                }
                Some(_) => continue,
            };
            return Err(RepositoryError::validation_with_context(
                problem,
                ErrorContext::new("store_events")
                    .with_entity("event")
                    .with_details(event.session_key.clone()),
            ));
        }

        let stored = data.events.entry(season_id).or_default();
        stored.extend_from_slice(events);
        stored.sort_by_key(|e| e.start);
        Ok(events.len())
    }

    async fn events_for_period(&self, season_id: SeasonId, period: u32) -> RepositoryResult<Vec<RaceEvent>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "events_for_period")?;
        let season = Self::season(&data, season_id, "events_for_period")?;

        Ok(data
            .events
            .get(&season_id)
            .map(|events| {
                events
                    .iter()
                    .filter(|e| season.period_of(e.start) == Some(period))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn events_for_season(&self, season_id: SeasonId) -> RepositoryResult<Vec<Vec<RaceEvent>>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "events_for_season")?;
        let season = Self::season(&data, season_id, "events_for_season")?;

        let mut periods: Vec<Vec<RaceEvent>> = Vec::new();
        for event in data.events.get(&season_id).into_iter().flatten() {
            let Some(period) = season.period_of(event.start) else {
                continue;
            };
            let period = period as usize;
            if periods.len() <= period {
                periods.resize_with(period + 1, Vec::new);
            }
            periods[period].push(event.clone());
        }
        Ok(periods)
    }

    async fn store_schedule(&self, season_id: SeasonId, descriptor: ScheduleDescriptor) -> RepositoryResult<()> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "store_schedule")?;
        let season = data.seasons.get_mut(&season_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("season {}", season_id),
                ErrorContext::new("store_schedule")
                    .with_entity("season")
                    .with_entity_id(season_id),
            )
        })?;
        season.schedule = Some(descriptor);
        Ok(())
    }
}
