//! Race slot heatmap HTTP server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin raceslots-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RACESLOTS_CACHE_DIR`: Artifact cache directory (default: ./cache)
//! - `RACESLOTS_LOCK_SCOPE`: `artifact` or `kind`
//! - `RUST_LOG`: Log level (default: info)
//!
//! Other settings come from `raceslots.toml` when one is found.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use raceslots::config::ServiceConfig;
use raceslots::db::{LocalRepository, RaceRepository};
use raceslots::http::{create_router, AppState};
use raceslots::services::HeatmapService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting raceslots HTTP server");

    let config = ServiceConfig::load()?;
    info!(
        cache_dir = %config.cache.directory.display(),
        lock_scope = ?config.cache.lock_scope,
        official_merge = ?config.binding.official_merge,
        "configuration loaded"
    );

    let repository: Arc<dyn RaceRepository> = Arc::new(LocalRepository::new());
    let heatmaps = Arc::new(HeatmapService::from_config(Arc::clone(&repository), &config));
    let app = create_router(AppState::new(repository, heatmaps));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
