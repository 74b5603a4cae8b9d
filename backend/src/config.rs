//! Service configuration file support.
//!
//! Settings are read from a `raceslots.toml` file; every field has a default,
//! so an empty file (or no file at all) is a valid configuration.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [cache]
//! directory = "cache"
//! fresh_minutes = 120
//! closed_after_days = 10
//! lock_scope = "artifact"
//!
//! [binding]
//! official_merge = "any"
//!
//! [heatmap]
//! intensity_floor = 64
//! intensity_ceiling = 255
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::cache::policy::{DEFAULT_CLOSED_AFTER_DAYS, DEFAULT_FRESH_FOR_MINUTES};
use crate::cache::{CachePolicy, LockScope};
use crate::models::OfficialMerge;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No raceslots.toml found in standard locations")]
    NotFound,

    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub binding: BindingSettings,
    #[serde(default)]
    pub heatmap: HeatmapSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Artifact cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Directory artifacts and their metadata are written to.
    #[serde(default = "default_cache_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_fresh_minutes")]
    pub fresh_minutes: i64,
    #[serde(default = "default_closed_after_days")]
    pub closed_after_days: i64,
    #[serde(default)]
    pub lock_scope: LockScope,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSettings {
    #[serde(default)]
    pub official_merge: OfficialMerge,
}

/// Output range of the strength-to-intensity mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapSettings {
    #[serde(default = "default_intensity_floor")]
    pub intensity_floor: i64,
    #[serde(default = "default_intensity_ceiling")]
    pub intensity_ceiling: i64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cache_directory() -> PathBuf {
    PathBuf::from("cache")
}

fn default_fresh_minutes() -> i64 {
    DEFAULT_FRESH_FOR_MINUTES
}

fn default_closed_after_days() -> i64 {
    DEFAULT_CLOSED_AFTER_DAYS
}

fn default_intensity_floor() -> i64 {
    64
}

fn default_intensity_ceiling() -> i64 {
    255
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            directory: default_cache_directory(),
            fresh_minutes: default_fresh_minutes(),
            closed_after_days: default_closed_after_days(),
            lock_scope: LockScope::default(),
        }
    }
}

impl Default for HeatmapSettings {
    fn default() -> Self {
        Self {
            intensity_floor: default_intensity_floor(),
            intensity_ceiling: default_intensity_ceiling(),
        }
    }
}

impl CacheSettings {
    pub fn policy(&self) -> CachePolicy {
        CachePolicy::new(
            Duration::minutes(self.fresh_minutes),
            Duration::days(self.closed_after_days),
        )
    }
}

impl ServiceConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `raceslots.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("raceslots.toml"),
            PathBuf::from("backend/raceslots.toml"),
            PathBuf::from("../raceslots.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Default-location file if present, built-in defaults otherwise, then
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::from_default_location() {
            Ok(config) => config,
            Err(ConfigError::NotFound) => Self::default(),
            Err(e) => return Err(e),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT`, `RACESLOTS_CACHE_DIR` and `RACESLOTS_LOCK_SCOPE`
    /// from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                name: "PORT".to_string(),
                value: port.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(dir) = lookup("RACESLOTS_CACHE_DIR") {
            self.cache.directory = PathBuf::from(dir);
        }
        if let Some(scope) = lookup("RACESLOTS_LOCK_SCOPE") {
            self.cache.lock_scope = scope.parse().map_err(|reason| ConfigError::InvalidValue {
                name: "RACESLOTS_LOCK_SCOPE".to_string(),
                value: scope.clone(),
                reason,
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.heatmap.intensity_ceiling <= self.heatmap.intensity_floor {
            return Err(ConfigError::InvalidValue {
                name: "heatmap.intensity_ceiling".to_string(),
                value: self.heatmap.intensity_ceiling.to_string(),
                reason: format!("must exceed intensity_floor ({})", self.heatmap.intensity_floor),
            });
        }
        if self.cache.fresh_minutes < 0 || self.cache.closed_after_days < 0 {
            return Err(ConfigError::InvalidValue {
                name: "cache".to_string(),
                value: format!("{}m/{}d", self.cache.fresh_minutes, self.cache.closed_after_days),
                reason: "thresholds must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = ServiceConfig::from_toml("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.cache.policy(), CachePolicy::default());
        assert_eq!(config.binding.official_merge, OfficialMerge::Any);
    }

    #[test]
    fn test_partial_sections() {
        let config = ServiceConfig::from_toml(
            r#"
            [cache]
            lock_scope = "kind"
            fresh_minutes = 30

            [binding]
            official_merge = "last"
            "#,
        )
        .unwrap();
        assert_eq!(config.cache.lock_scope, LockScope::Kind);
        assert_eq!(config.cache.fresh_minutes, 30);
        assert_eq!(config.cache.closed_after_days, 10);
        assert_eq!(config.binding.official_merge, OfficialMerge::LastWins);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_inverted_intensity_range_rejected() {
        let err = ServiceConfig::from_toml("[heatmap]\nintensity_floor = 200\nintensity_ceiling = 100\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "heatmap.intensity_ceiling"));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [("PORT", "9000"), ("RACESLOTS_LOCK_SCOPE", "kind")].into_iter().collect();
        let mut config = ServiceConfig::default();
        config
            .apply_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.cache.lock_scope, LockScope::Kind);
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_overrides(|name| (name == "PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "PORT"));
    }
}
