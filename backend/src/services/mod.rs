//! Service layer: schedule bootstrap, heatmap assembly, rendering and cached
//! artifact delivery.

pub mod artifacts;
pub mod error;
pub mod heatmap;
pub mod render;
pub mod schedule;

pub use artifacts::HeatmapService;
pub use error::{HeatmapError, HeatmapResult};
pub use heatmap::{build_season_heatmap, build_week_heatmap, HeatmapCell, HeatmapData, IntensityRange};
pub use render::{ArtifactRenderer, JsonRenderer, DEFAULT_STYLE, JSON_STYLES};
pub use schedule::ensure_season_schedule;
