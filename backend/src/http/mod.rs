//! HTTP server module.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                  │
//! │  - request parsing, JSON, error mapping      │
//! │  - CORS, compression, tracing                │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  services/ (schedule bootstrap, heatmaps)    │
//! └──────────┬────────────────────────┬──────────┘
//!            │                        │
//! ┌──────────▼──────────┐   ┌─────────▼──────────┐
//! │  db/ (repository)   │   │  cache/ (artifacts)│
//! └─────────────────────┘   └────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
