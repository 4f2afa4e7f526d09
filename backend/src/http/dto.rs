//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies accept the same lenient dates as the item model: anything
//! that does not parse is treated as absent, which yields an empty result
//! rather than a rejected request.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::TimelineConfig;
use crate::models::{deserialize_lenient_date, deserialize_lenient_day, Granularity, PeriodAnchor, PeriodCell, TimelineItem};
use crate::services::{AutoSaveStats, BarPosition, RowKey, TimelineRequest};

pub use crate::services::TimelineProjection;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body of `POST /v1/timeline/periods`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodsRequest {
    #[serde(default, deserialize_with = "deserialize_lenient_day")]
    pub range_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_day")]
    pub range_end: Option<NaiveDate>,
    /// Falls back to the configured default granularity
    #[serde(default)]
    pub granularity: Option<Granularity>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodsResponse {
    pub granularity: Granularity,
    pub cells: Vec<PeriodCell>,
    pub total_days: i64,
}

/// Body of `POST /v1/timeline/position`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRequest {
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub segment_start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub segment_end: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub timeline_start: Option<NaiveDateTime>,
    pub total_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionResponse {
    pub position: Option<BarPosition>,
}

/// Body of `POST /v1/timeline/marker`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerRequest {
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub timeline_start: Option<NaiveDateTime>,
    pub total_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerResponse {
    pub offset_percent: Option<f64>,
}

/// Body of `POST /v1/timeline/projection`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectionRequest {
    #[serde(default, deserialize_with = "deserialize_lenient_day")]
    pub range_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_day")]
    pub range_end: Option<NaiveDate>,
    #[serde(default)]
    pub granularity: Option<Granularity>,
    #[serde(default)]
    pub anchor: Option<PeriodAnchor>,
    #[serde(default)]
    pub row_key: RowKey,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_day")]
    pub today: Option<NaiveDate>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub items: Vec<TimelineItem>,
}

/// Body of `PUT /v1/timeline/draft`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRequest {
    /// Rows added or removed; written at once instead of debounced
    #[serde(default)]
    pub structural: bool,
    pub draft: TimelineRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftResponse {
    /// Set by flush: `true` when nothing is left unwritten
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
    pub stats: AutoSaveStats,
}

impl ProjectionRequest {
    /// Fill unset options from the configuration.
    pub fn into_timeline_request(self, config: &TimelineConfig) -> TimelineRequest {
        TimelineRequest {
            range_start: self.range_start,
            range_end: self.range_end,
            granularity: self.granularity.unwrap_or(config.timeline.default_granularity),
            anchor: self.anchor.unwrap_or(config.timeline.anchor),
            row_key: self.row_key,
            search: self.search,
            today: self.today,
            items: self.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_request_defaults_from_config() {
        let mut config = TimelineConfig::default();
        config.timeline.default_granularity = Granularity::Weekly;
        config.timeline.anchor = PeriodAnchor::End;

        let request: ProjectionRequest = serde_json::from_str(r#"{"range_start": "2024-01-01"}"#).unwrap();
        let timeline = request.into_timeline_request(&config);

        assert_eq!(timeline.granularity, Granularity::Weekly);
        assert_eq!(timeline.anchor, PeriodAnchor::End);
        assert_eq!(timeline.range_end, None);
    }

    #[test]
    fn test_position_request_lenient_dates() {
        let request: PositionRequest = serde_json::from_str(
            r#"{"segment_start": "2024-02-10", "segment_end": "??", "timeline_start": "2024-01-01", "total_days": 90}"#,
        )
        .unwrap();
        assert!(request.segment_start.is_some());
        assert!(request.segment_end.is_none());
    }
}
