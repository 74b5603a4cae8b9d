#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use raceslots::db::{LocalRepository, RaceRepository};
use raceslots::models::{RaceEvent, Season, SeasonId};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Variables are restored on drop (including unwinds) and access is
/// serialized, since the environment is process-global.
///
/// `Some(v)` sets a variable, `None` removes it.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub const SEASON_ID: SeasonId = SeasonId(7);

/// Hours of the fixture grid: every four hours from 02:30.
pub const GRID_HOURS: [u32; 6] = [2, 6, 10, 14, 18, 22];
pub const GRID_MINUTE: u32 = 30;

/// A Tuesday at midnight.
pub fn season_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap()
}

pub fn season() -> Season {
    Season::new(SEASON_ID, "2024 Season 1", season_start())
}

/// One session at `day` (days since season start) and grid hour `hour`.
pub fn session(day: i64, hour: u32, official: bool, size: u32, strength: u32) -> RaceEvent {
    let start = season_start() + Duration::days(day) + Duration::hours(i64::from(hour)) + Duration::minutes(i64::from(GRID_MINUTE));
    RaceEvent::new(start, official, size, strength, format!("d{}-h{}", day, hour))
}

/// Every grid slot of `weeks` weeks, with strength rising by slot index.
pub fn full_grid(weeks: i64) -> Vec<RaceEvent> {
    let mut events = Vec::new();
    for day in 0..weeks * 7 {
        for (i, hour) in GRID_HOURS.iter().enumerate() {
            events.push(session(day, *hour, i % 2 == 0, 10 + i as u32, 1000 + 100 * i as u32));
        }
    }
    events
}

/// Repository holding the fixture season and `events`.
pub async fn seeded_repository(events: &[RaceEvent]) -> LocalRepository {
    let repo = LocalRepository::new();
    repo.store_season(&season()).await.unwrap();
    repo.store_events(SEASON_ID, events).await.unwrap();
    repo
}
