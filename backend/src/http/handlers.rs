//! HTTP handlers for the REST API.
//!
//! Handlers parse the request, delegate to the db and heatmap services and
//! shape the response.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    CreateSeasonRequest, HealthResponse, HeatmapQuery, ScheduleResponse, SeasonDto, SeasonListResponse,
    StoreEventsRequest, StoreEventsResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::cache::Artifact;
use crate::db::services as db_services;
use crate::models::{Season, SeasonId};
use crate::services::{ensure_season_schedule, DEFAULT_STYLE};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

static ARTIFACT_CACHE_HEADER: HeaderName = HeaderName::from_static("x-artifact-cache");

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Seasons
// =============================================================================

/// GET /v1/seasons
pub async fn list_seasons(State(state): State<AppState>) -> HandlerResult<SeasonListResponse> {
    let seasons: Vec<SeasonDto> = db_services::list_seasons(state.repository.as_ref())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = seasons.len();
    Ok(Json(SeasonListResponse { seasons, total }))
}

/// POST /v1/seasons
pub async fn create_season(
    State(state): State<AppState>,
    Json(request): Json<CreateSeasonRequest>,
) -> Result<(StatusCode, Json<SeasonDto>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("season name must not be empty".to_string()));
    }
    let season = Season::new(SeasonId::new(request.id), request.name, request.start);
    db_services::store_season(state.repository.as_ref(), &season).await?;
    Ok((StatusCode::CREATED, Json(season.into())))
}

/// GET /v1/seasons/{season_id}
pub async fn get_season(
    State(state): State<AppState>,
    Path(season_id): Path<i64>,
) -> HandlerResult<SeasonDto> {
    let season = db_services::get_season(state.repository.as_ref(), SeasonId::new(season_id)).await?;
    Ok(Json(season.into()))
}

/// POST /v1/seasons/{season_id}/events
pub async fn store_events(
    State(state): State<AppState>,
    Path(season_id): Path<i64>,
    Json(request): Json<StoreEventsRequest>,
) -> HandlerResult<StoreEventsResponse> {
    let stored = db_services::store_events(state.repository.as_ref(), SeasonId::new(season_id), &request.events).await?;
    Ok(Json(StoreEventsResponse { season_id, stored }))
}

/// POST /v1/seasons/{season_id}/schedule
///
/// Infer the season's schedule if it is not known yet; returns the stored
/// descriptor either way.
pub async fn ensure_schedule(
    State(state): State<AppState>,
    Path(season_id): Path<i64>,
) -> HandlerResult<ScheduleResponse> {
    let descriptor = ensure_season_schedule(state.repository.as_ref(), SeasonId::new(season_id)).await?;
    Ok(Json(ScheduleResponse::new(season_id, descriptor)))
}

// =============================================================================
// Heatmaps
// =============================================================================

/// GET /v1/seasons/{season_id}/weeks/{week}/heatmap
pub async fn get_week_heatmap(
    State(state): State<AppState>,
    Path((season_id, week)): Path<(i64, u32)>,
    Query(query): Query<HeatmapQuery>,
) -> Result<Response, AppError> {
    let style = query.style.as_deref().unwrap_or(DEFAULT_STYLE);
    let artifact = state
        .heatmaps
        .week_artifact(SeasonId::new(season_id), week, style)
        .await?;
    Ok(artifact_response(state.heatmaps.content_type(), artifact))
}

/// GET /v1/seasons/{season_id}/heatmap
///
/// Average over every week of the season.
pub async fn get_season_heatmap(
    State(state): State<AppState>,
    Path(season_id): Path<i64>,
    Query(query): Query<HeatmapQuery>,
) -> Result<Response, AppError> {
    let style = query.style.as_deref().unwrap_or(DEFAULT_STYLE);
    let artifact = state
        .heatmaps
        .season_artifact(SeasonId::new(season_id), style)
        .await?;
    Ok(artifact_response(state.heatmaps.content_type(), artifact))
}

fn artifact_response(content_type: &'static str, artifact: Artifact) -> Response {
    let cache_status = if artifact.regenerated { "miss" } else { "hit" };
    let etag = format!("\"{}\"", artifact.entry.checksum);
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::ETAG, etag),
            (ARTIFACT_CACHE_HEADER.clone(), cache_status.to_string()),
        ],
        artifact.bytes,
    )
        .into_response()
}
