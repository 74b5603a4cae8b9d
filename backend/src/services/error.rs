//! Errors raised by the heatmap services.

use crate::cache::CacheError;
use crate::db::RepositoryError;
use crate::error::ScheduleError;
use crate::models::SeasonId;

pub type HeatmapResult<T> = Result<T, HeatmapError>;

#[derive(Debug, thiserror::Error)]
pub enum HeatmapError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Grid requested for a season with no descriptor.
    #[error("Season {0} has no inferred schedule")]
    ScheduleMissing(SeasonId),

    #[error("Unsupported style '{0}'")]
    InvalidStyle(String),

    #[error("Week {week} is out of range for season {season}")]
    WeekOutOfRange { season: SeasonId, week: u32 },
}
