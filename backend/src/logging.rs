//! Tracing subscriber setup for the server binary.

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::FmtSubscriber;

use crate::error::{TimelineError, TimelineResult};

/// Level used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build a filter from a `RUST_LOG`-style directive string, such as
/// `debug` or `procurement_timeline=debug,tower_http=info`.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global fmt subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() -> TimelineResult<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    FmtSubscriber::builder()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| TimelineError::Configuration(format!("Failed to install tracing subscriber: {}", e)))
}
