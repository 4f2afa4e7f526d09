//! Application state for the HTTP server.

use std::sync::Arc;

use chrono::Locale;
use tracing::info;

use crate::config::TimelineConfig;
use crate::error::TimelineResult;
use crate::services::{AutoSaver, JsonFileSink, TimelineRequest};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TimelineConfig>,
    /// Locale used when a request does not name one
    pub default_locale: Locale,
    /// Debounced writer for the editor's working request, present when
    /// `autosave.path` is configured
    pub drafts: Option<Arc<AutoSaver<TimelineRequest>>>,
}

impl AppState {
    /// Create the state from a validated configuration.
    ///
    /// When a draft path is configured the auto-save worker is spawned, so
    /// this must then be called from within a tokio runtime.
    pub fn new(config: TimelineConfig) -> TimelineResult<Self> {
        let default_locale = config.locale()?;

        let drafts = config.autosave.path.as_ref().map(|path| {
            info!(path = %path.display(), debounce_ms = config.autosave.debounce_ms, "Draft auto-save enabled");
            let sink = Arc::new(JsonFileSink::new(path));
            Arc::new(AutoSaver::spawn(sink, config.debounce()))
        });

        Ok(Self {
            config: Arc::new(config),
            default_locale,
            drafts,
        })
    }
}
