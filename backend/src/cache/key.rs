//! Artifact identity and cache metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::SeasonId;

/// Visualization kind an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// One racing week of one season.
    WeekHeatmap,
    /// Average over every week of a season.
    SeasonAverage,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::WeekHeatmap => "week_heatmap",
            ArtifactKind::SeasonAverage => "season_average",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one cached artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub kind: ArtifactKind,
    pub season: SeasonId,
    /// Week index; `None` for season-wide artifacts.
    pub period: Option<u32>,
    /// Optional extra discriminator, e.g. a team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_key: Option<String>,
}

impl ArtifactKey {
    pub fn week(season: SeasonId, period: u32) -> Self {
        Self {
            kind: ArtifactKind::WeekHeatmap,
            season,
            period: Some(period),
            sub_key: None,
        }
    }

    pub fn season_average(season: SeasonId) -> Self {
        Self {
            kind: ArtifactKind::SeasonAverage,
            season,
            period: None,
            sub_key: None,
        }
    }

    pub fn with_sub_key(mut self, sub_key: impl Into<String>) -> Self {
        self.sub_key = Some(sub_key.into());
        self
    }

    /// Filesystem-safe name, unique per key.
    ///
    /// The sub-key is free text, so it is hashed rather than embedded.
    pub fn storage_name(&self) -> String {
        let period = self
            .period
            .map(|p| p.to_string())
            .unwrap_or_else(|| "all".to_string());
        let mut name = format!("{}-{}-{}", self.kind, self.season, period);
        if let Some(sub_key) = &self.sub_key {
            let digest = hex::encode(Sha256::digest(sub_key.as_bytes()));
            name.push('-');
            name.push_str(&digest[..16]);
        }
        name
    }
}

impl std::fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.storage_name())
    }
}

/// Metadata written next to every artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: ArtifactKey,
    /// Style key the artifact was rendered with.
    pub style: String,
    /// Start of the window the artifact summarizes.
    pub anchor: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// SHA-256 of the artifact bytes, hex encoded.
    pub checksum: String,
}

impl CacheEntry {
    pub fn new(
        key: ArtifactKey,
        style: impl Into<String>,
        anchor: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        bytes: &[u8],
    ) -> Self {
        Self {
            key,
            style: style.into(),
            anchor,
            updated_at,
            checksum: checksum(bytes),
        }
    }

    pub fn matches_bytes(&self, bytes: &[u8]) -> bool {
        self.checksum == checksum(bytes)
    }
}

/// Hex-encoded SHA-256 of a byte slice.
pub fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
