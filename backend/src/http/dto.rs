//! Data Transfer Objects for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{RaceEvent, ScheduleDescriptor, Season};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Repository connection status
    pub database: String,
}

/// Season summary for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonDto {
    pub id: i64,
    pub name: String,
    pub start: DateTime<Utc>,
    /// Persisted descriptor, e.g. `"30 14/4 * * *"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

impl From<Season> for SeasonDto {
    fn from(season: Season) -> Self {
        Self {
            id: season.id.value(),
            name: season.name,
            start: season.start,
            schedule: season.schedule.map(|d| d.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonListResponse {
    pub seasons: Vec<SeasonDto>,
    pub total: usize,
}

/// Request body for registering a season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSeasonRequest {
    pub id: i64,
    pub name: String,
    pub start: DateTime<Utc>,
}

/// Request body for ingesting race results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEventsRequest {
    pub events: Vec<RaceEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEventsResponse {
    pub season_id: i64,
    pub stored: usize,
}

/// Inferred schedule of a season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub season_id: i64,
    pub descriptor: String,
    pub minute: u32,
    pub starting_hour: u32,
    pub hourly_interval: u32,
}

impl ScheduleResponse {
    pub fn new(season_id: i64, descriptor: ScheduleDescriptor) -> Self {
        Self {
            season_id,
            descriptor: descriptor.to_string(),
            minute: descriptor.minute(),
            starting_hour: descriptor.starting_hour(),
            hourly_interval: descriptor.hourly_interval(),
        }
    }
}

/// Query parameters for heatmap endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HeatmapQuery {
    /// Style key (default: "classic")
    #[serde(default)]
    pub style: Option<String>,
}
