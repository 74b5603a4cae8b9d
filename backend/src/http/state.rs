//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::RaceRepository;
use crate::services::HeatmapService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn RaceRepository>,
    pub heatmaps: Arc<HeatmapService>,
}

impl AppState {
    pub fn new(repository: Arc<dyn RaceRepository>, heatmaps: Arc<HeatmapService>) -> Self {
        Self { repository, heatmaps }
    }
}
