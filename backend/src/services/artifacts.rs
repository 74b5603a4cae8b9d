//! Cached heatmap artifacts.
//!
//! [`HeatmapService`] is the entry point used by the HTTP layer: it resolves
//! the season and its schedule, then serves the rendered artifact from the
//! cache or regenerates it under the artifact's lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::error::{HeatmapError, HeatmapResult};
use super::heatmap::{build_season_heatmap, build_week_heatmap, week_anchor, IntensityRange};
use super::render::{ArtifactRenderer, JsonRenderer};
use super::schedule::ensure_season_schedule;
use crate::cache::{Artifact, ArtifactCache, ArtifactKey, FsArtifactStore, LockRegistry};
use crate::config::ServiceConfig;
use crate::db::{self, RaceRepository};
use crate::models::{OfficialMerge, Season, SeasonId};

pub struct HeatmapService {
    repository: Arc<dyn RaceRepository>,
    cache: ArtifactCache,
    renderer: Arc<dyn ArtifactRenderer>,
    merge: OfficialMerge,
    range: IntensityRange,
}

impl HeatmapService {
    pub fn new(
        repository: Arc<dyn RaceRepository>,
        cache: ArtifactCache,
        renderer: Arc<dyn ArtifactRenderer>,
        merge: OfficialMerge,
        range: IntensityRange,
    ) -> Self {
        Self {
            repository,
            cache,
            renderer,
            merge,
            range,
        }
    }

    /// Service writing artifacts under the configured cache directory and
    /// rendering them as JSON.
    pub fn from_config(repository: Arc<dyn RaceRepository>, config: &ServiceConfig) -> Self {
        let cache = ArtifactCache::new(
            Arc::new(FsArtifactStore::new(&config.cache.directory)),
            LockRegistry::new(config.cache.lock_scope),
            config.cache.policy(),
        );
        Self::new(
            repository,
            cache,
            Arc::new(JsonRenderer),
            config.binding.official_merge,
            config.heatmap.into(),
        )
    }

    pub fn repository(&self) -> &Arc<dyn RaceRepository> {
        &self.repository
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    pub fn content_type(&self) -> &'static str {
        self.renderer.content_type()
    }

    /// Rendered heatmap of one week of a season.
    pub async fn week_artifact(&self, season_id: SeasonId, week: u32, style: &str) -> HeatmapResult<Artifact> {
        let season = self.prepare(season_id, style).await?;
        let key = ArtifactKey::week(season_id, week);
        let window_start = week_anchor(&season, week)?;

        let artifact = self
            .cache
            .get_or_regenerate(&key, style, window_start, || async {
                let events = db::events_for_period(self.repository.as_ref(), season_id, week).await?;
                let data = build_week_heatmap(&season, week, &events, self.merge, self.range)?;
                self.renderer.render(&data, style)
            })
            .await?;
        Ok(artifact)
    }

    /// Rendered average over every week of a season.
    ///
    /// The average keeps changing while its latest week receives results, so
    /// that week's start is the window judged for staleness.
    pub async fn season_artifact(&self, season_id: SeasonId, style: &str) -> HeatmapResult<Artifact> {
        let season = self.prepare(season_id, style).await?;
        let key = ArtifactKey::season_average(season_id);
        let periods = db::events_for_season(self.repository.as_ref(), season_id).await?;
        let window_start = latest_period_start(&season, periods.len());

        let artifact = self
            .cache
            .get_or_regenerate(&key, style, window_start, || async {
                let data = build_season_heatmap(&season, &periods, self.merge, self.range)?;
                self.renderer.render(&data, style)
            })
            .await?;
        Ok(artifact)
    }

    /// Validate the style and load the season with its schedule resolved.
    async fn prepare(&self, season_id: SeasonId, style: &str) -> HeatmapResult<Season> {
        if !self.renderer.supports_style(style) {
            return Err(HeatmapError::InvalidStyle(style.to_string()));
        }
        let descriptor = ensure_season_schedule(self.repository.as_ref(), season_id).await?;
        let mut season = db::get_season(self.repository.as_ref(), season_id).await?;
        season.schedule = Some(descriptor);
        debug!(season = %season_id, style, schedule = %descriptor, "season ready for rendering");
        Ok(season)
    }
}

fn latest_period_start(season: &Season, period_count: usize) -> DateTime<Utc> {
    u32::try_from(period_count.saturating_sub(1))
        .ok()
        .and_then(|latest| season.period_start(latest))
        .unwrap_or(season.start)
}
