//! Storage for seasons, race events and inferred schedules.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Heatmap services / HTTP handlers           │
//! └───────────────────┬─────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────┐
//! │  services.rs - operation context + logging  │
//! └───────────────────┬─────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────┐
//! │  RaceRepository trait (repository/)         │
//! └───────────────────┬─────────────────────────┘
//!                     │
//!          ┌──────────▼──────────┐
//!          │  LocalRepository    │
//!          │  (in-memory)        │
//!          └─────────────────────┘
//! ```
//!
//! Prefer the functions in [`services`] over calling the trait directly: they
//! attach the operation name to every error.

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod repositories;
pub mod repository;
pub mod services;

pub use repositories::LocalRepository;
pub use repository::{ErrorContext, RaceRepository, RepositoryError, RepositoryResult};
pub use services::{
    events_for_period, events_for_season, get_season, health_check, list_seasons, season_event_starts,
    store_events, store_schedule, store_season,
};
