mod support;

use std::io::Write;
use std::path::PathBuf;

use raceslots::cache::LockScope;
use raceslots::config::{ConfigError, ServiceConfig};
use raceslots::models::OfficialMerge;

use support::with_scoped_env;

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
port = 9100

[cache]
directory = "/var/cache/raceslots"
closed_after_days = 14

[binding]
official_merge = "last_wins"

[heatmap]
intensity_floor = 0
intensity_ceiling = 100
"#
    )
    .unwrap();

    let config = ServiceConfig::from_file(file.path()).unwrap();
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.cache.directory, PathBuf::from("/var/cache/raceslots"));
    assert_eq!(config.cache.closed_after_days, 14);
    assert_eq!(config.cache.fresh_minutes, 120);
    assert_eq!(config.binding.official_merge, OfficialMerge::LastWins);
    assert_eq!(config.heatmap.intensity_ceiling, 100);
}

#[test]
fn test_missing_file() {
    let err = ServiceConfig::from_file("/nonexistent/raceslots.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_invalid_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[cache\nfresh_minutes = ").unwrap();
    let err = ServiceConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_apply_env_overrides() {
    let config = with_scoped_env(
        &[
            ("HOST", Some("127.0.0.1")),
            ("PORT", Some("3000")),
            ("RACESLOTS_CACHE_DIR", Some("/tmp/heatmaps")),
            ("RACESLOTS_LOCK_SCOPE", Some("KIND")),
        ],
        || {
            let mut config = ServiceConfig::default();
            config.apply_env().unwrap();
            config
        },
    );
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.cache.directory, PathBuf::from("/tmp/heatmaps"));
    assert_eq!(config.cache.lock_scope, LockScope::Kind);
}

#[test]
fn test_apply_env_rejects_unknown_scope() {
    let result = with_scoped_env(
        &[
            ("HOST", None),
            ("PORT", None),
            ("RACESLOTS_CACHE_DIR", None),
            ("RACESLOTS_LOCK_SCOPE", Some("global")),
        ],
        || ServiceConfig::default().apply_env(),
    );
    assert!(matches!(result, Err(ConfigError::InvalidValue { ref name, .. }) if name == "RACESLOTS_LOCK_SCOPE"));
}
