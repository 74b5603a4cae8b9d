//! Repository trait for season and race event storage.
//!
//! The heatmap core only reads seasons and events and writes back an inferred
//! schedule descriptor. Any storage engine can sit behind this trait.
//!
//! Calls may be slow or fail; no timeout is imposed here. Callers that need
//! one should wrap the future with `tokio::time::timeout`.

pub mod error;

use async_trait::async_trait;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::models::{RaceEvent, ScheduleDescriptor, Season, SeasonId};

/// Storage operations used by the heatmap services.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request tasks.
#[async_trait]
pub trait RaceRepository: Send + Sync {
    /// Check if the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert or replace a season.
    async fn store_season(&self, season: &Season) -> RepositoryResult<()>;

    /// Retrieve a season by ID.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the season doesn't exist
    async fn get_season(&self, season_id: SeasonId) -> RepositoryResult<Season>;

    /// All seasons, ordered by start.
    async fn list_seasons(&self) -> RepositoryResult<Vec<Season>>;

    /// Append race events to a season. Returns the number stored.
    async fn store_events(&self, season_id: SeasonId, events: &[RaceEvent]) -> RepositoryResult<usize>;

    /// Events of one week (period) of a season, in start order.
    async fn events_for_period(&self, season_id: SeasonId, period: u32) -> RepositoryResult<Vec<RaceEvent>>;

    /// Events of a season grouped by period index.
    ///
    /// Index `i` of the result holds week `i`; weeks with no events are
    /// present as empty lists up to the last week that has any.
    async fn events_for_season(&self, season_id: SeasonId) -> RepositoryResult<Vec<Vec<RaceEvent>>>;

    /// Persist an inferred schedule descriptor on a season.
    async fn store_schedule(&self, season_id: SeasonId, descriptor: ScheduleDescriptor) -> RepositoryResult<()>;
}
