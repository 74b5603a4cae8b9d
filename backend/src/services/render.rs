//! Artifact rendering.
//!
//! Renderers turn a [`HeatmapData`] grid into the bytes stored in the artifact
//! cache. The style key selects a visual theme; renderers decide which style
//! keys they understand.

use serde::Serialize;

use super::heatmap::HeatmapData;

/// Turns heatmap grids into artifact bytes.
pub trait ArtifactRenderer: Send + Sync {
    /// MIME type of the produced bytes.
    fn content_type(&self) -> &'static str;

    fn supports_style(&self, style: &str) -> bool;

    fn render(&self, data: &HeatmapData, style: &str) -> anyhow::Result<Vec<u8>>;
}

/// Style keys understood by [`JsonRenderer`].
pub const JSON_STYLES: &[&str] = &["classic", "dark", "contrast"];

pub const DEFAULT_STYLE: &str = "classic";

/// Renders the grid as a JSON document tagged with its style.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct StyledHeatmap<'a> {
    style: &'a str,
    #[serde(flatten)]
    data: &'a HeatmapData,
}

impl ArtifactRenderer for JsonRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn supports_style(&self, style: &str) -> bool {
        JSON_STYLES.contains(&style)
    }

    fn render(&self, data: &HeatmapData, style: &str) -> anyhow::Result<Vec<u8>> {
        anyhow::ensure!(self.supports_style(style), "unsupported style '{}'", style);
        Ok(serde_json::to_vec(&StyledHeatmap { style, data })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeasonId;

    fn empty() -> HeatmapData {
        HeatmapData {
            season_id: SeasonId::new(1),
            week: Some(0),
            cells: Vec::new(),
            strength_min: 0,
            strength_max: 0,
        }
    }

    #[test]
    fn test_render_tags_style() {
        let bytes = JsonRenderer.render(&empty(), "dark").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["style"], "dark");
        assert_eq!(value["season_id"], 1);
        assert_eq!(value["week"], 0);
    }

    #[test]
    fn test_unknown_style_rejected() {
        assert!(!JsonRenderer.supports_style("neon"));
        assert!(JsonRenderer.render(&empty(), "neon").is_err());
    }
}
