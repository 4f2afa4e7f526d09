//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer. Projections are cheap and synchronous, so they run inline.

use axum::{extract::State, Json};
use chrono::Locale;
use tracing::debug;

use super::dto::{
    DraftRequest, DraftResponse, HealthResponse, MarkerRequest, MarkerResponse, PeriodsRequest, PeriodsResponse,
    PositionRequest, PositionResponse, ProjectionRequest, TimelineProjection,
};
use super::error::AppError;
use super::extract::ApiJson;
use super::state::AppState;
use crate::services::{bucket_periods, marker_position, parse_locale, position, project_timeline, TimelineWindow};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn resolve_locale(state: &AppState, requested: Option<&str>) -> Result<Locale, AppError> {
    match requested {
        Some(tag) if !tag.trim().is_empty() => Ok(parse_locale(tag)?),
        _ => Ok(state.default_locale),
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
    }))
}

// =============================================================================
// Timeline Endpoints
// =============================================================================

/// POST /v1/timeline/periods
///
/// Period cells for a range. An invalid or missing range yields no cells.
pub async fn get_periods(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PeriodsRequest>,
) -> HandlerResult<PeriodsResponse> {
    let locale = resolve_locale(&state, request.locale.as_deref())?;
    let granularity = request
        .granularity
        .unwrap_or(state.config.timeline.default_granularity);

    let cells = match (request.range_start, request.range_end) {
        (Some(start), Some(end)) => bucket_periods(start, end, granularity, locale),
        _ => Vec::new(),
    };
    let total_days = TimelineWindow::from_cells(&cells)
        .map(|w| w.total_days)
        .unwrap_or(0);

    Ok(Json(PeriodsResponse {
        granularity,
        cells,
        total_days,
    }))
}

/// POST /v1/timeline/position
pub async fn get_position(ApiJson(request): ApiJson<PositionRequest>) -> HandlerResult<PositionResponse> {
    let placed = match (request.segment_start, request.segment_end, request.timeline_start) {
        (Some(start), Some(end), Some(timeline_start)) => {
            position(start, end, timeline_start, request.total_days)
        }
        _ => None,
    };

    Ok(Json(PositionResponse { position: placed }))
}

/// POST /v1/timeline/marker
pub async fn get_marker(ApiJson(request): ApiJson<MarkerRequest>) -> HandlerResult<MarkerResponse> {
    let offset_percent = match (request.date, request.timeline_start) {
        (Some(date), Some(timeline_start)) => marker_position(date, timeline_start, request.total_days),
        _ => None,
    };

    Ok(Json(MarkerResponse { offset_percent }))
}

/// POST /v1/timeline/projection
///
/// Full projection: columns, bars, grouped rows and totals.
pub async fn get_projection(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ProjectionRequest>,
) -> HandlerResult<TimelineProjection> {
    let locale = resolve_locale(&state, request.locale.as_deref())?;
    let mut timeline_request = request.into_timeline_request(&state.config);
    if timeline_request.today.is_none() {
        timeline_request.today = Some(chrono::Local::now().date_naive());
    }

    let projection = project_timeline(&timeline_request, locale);
    debug!(
        items = projection.counts.total_items,
        columns = projection.columns.len(),
        "Projection computed"
    );

    Ok(Json(projection))
}

// =============================================================================
// Drafts
// =============================================================================

/// PUT /v1/timeline/draft
///
/// Hands the editor's working request to the auto-saver. Field edits are
/// debounced; structural edits are written straight away.
pub async fn save_draft(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DraftRequest>,
) -> HandlerResult<DraftResponse> {
    let drafts = state.drafts.as_ref().ok_or(AppError::DraftsDisabled)?;

    if request.structural {
        drafts.structural_edit(request.draft)?;
    } else {
        drafts.field_edit(request.draft)?;
    }

    Ok(Json(DraftResponse {
        saved: None,
        stats: drafts.stats(),
    }))
}

/// POST /v1/timeline/draft/flush
pub async fn flush_draft(State(state): State<AppState>) -> HandlerResult<DraftResponse> {
    let drafts = state.drafts.as_ref().ok_or(AppError::DraftsDisabled)?;
    let saved = drafts.flush().await?;

    Ok(Json(DraftResponse {
        saved: Some(saved),
        stats: drafts.stats(),
    }))
}
