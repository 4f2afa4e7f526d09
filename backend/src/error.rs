//! Error types for the fallible edges of the crate.
//!
//! The projection functions themselves never fail: bad dates are treated as
//! absent and invalid ranges produce empty results. Errors only arise while
//! parsing configuration or user-supplied enum values, and when the auto-save
//! worker has gone away.

use thiserror::Error;

/// Result type for timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("unknown granularity '{0}' (expected weekly, monthly or quarterly)")]
    UnknownGranularity(String),

    #[error("unknown period anchor '{0}' (expected start or end)")]
    UnknownAnchor(String),

    #[error("unknown locale '{0}'")]
    UnknownLocale(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("auto-save worker is no longer running")]
    AutoSaveClosed,
}

impl TimelineError {
    /// Whether the error was caused by caller input rather than the environment.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            TimelineError::UnknownGranularity(_)
                | TimelineError::UnknownAnchor(_)
                | TimelineError::UnknownLocale(_)
        )
    }
}
