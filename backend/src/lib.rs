//! # raceslots
//!
//! Recurring race schedule inference and timeslot heatmaps.
//!
//! Online racing series run sessions on a fixed daily grid (for example every
//! four hours at half past). This crate recovers that grid from observed
//! session start times, expands it into concrete weekly slots, binds race
//! results to slots and averages them over a season. Rendered heatmaps are
//! cached on disk with a two-threshold staleness policy and per-artifact
//! regeneration locks.
//!
//! ## Features
//!
//! - **Schedule inference**: recover `minute`, `starting_hour` and
//!   `hourly_interval` from event timestamps
//! - **Expansion**: enumerate every slot of a day or week
//! - **Binding and seasonal averaging**: per-slot field size, strength and
//!   official flag
//! - **Artifact cache**: check, lock, recheck, regenerate
//! - **HTTP API**: axum endpoints for seasons, schedules and heatmaps
//!
//! ## Architecture
//!
//! - [`models`]: seasons, events, descriptors, timeslots, aggregates
//! - [`algorithms`]: pure inference, expansion, binding, averaging, range mapping
//! - [`cache`]: artifact keys, staleness policy, locks and stores
//! - [`db`]: repository trait and in-memory implementation
//! - [`services`]: schedule bootstrap, heatmap assembly, rendering
//! - [`config`]: `raceslots.toml` settings
//! - `http`: axum router and handlers (feature `http-server`)

// RepositoryError carries context for debugging.
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{ScheduleError, ScheduleResult};
