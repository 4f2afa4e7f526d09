//! Timeline HTTP Server Binary
//!
//! Loads configuration, builds the router and serves the projection API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin timeline-server --features http-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `TIMELINE_LOCALE`, `TIMELINE_GRANULARITY`, `TIMELINE_ANCHOR`: projection defaults
//! - `AUTOSAVE_DEBOUNCE_MS`, `AUTOSAVE_PATH`: draft auto-save
//! - `RUST_LOG`: Log filter, e.g. `debug` or `procurement_timeline=debug,tower_http=info` (default: info)
//!
//! Settings may also come from a `timeline.toml` file; see
//! `procurement_timeline::config`.

use std::net::SocketAddr;

use tracing::info;

use procurement_timeline::config::TimelineConfig;
use procurement_timeline::http::{create_router, AppState};
use procurement_timeline::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("Starting timeline projection server");

    let config = TimelineConfig::load()?;
    info!(
        locale = %config.timeline.locale,
        granularity = %config.timeline.default_granularity,
        "Configuration loaded"
    );

    let addr: SocketAddr = config.bind_addr().parse()?;
    let app = create_router(AppState::new(config)?);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
