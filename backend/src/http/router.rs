//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing).

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS; restrict in production deployments.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/seasons", get(handlers::list_seasons).post(handlers::create_season))
        .route("/seasons/{season_id}", get(handlers::get_season))
        .route("/seasons/{season_id}/events", post(handlers::store_events))
        .route("/seasons/{season_id}/schedule", post(handlers::ensure_schedule))
        .route("/seasons/{season_id}/heatmap", get(handlers::get_season_heatmap))
        .route(
            "/seasons/{season_id}/weeks/{week}/heatmap",
            get(handlers::get_week_heatmap),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
