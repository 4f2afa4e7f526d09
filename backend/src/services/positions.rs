//! Bar position math.
//!
//! Maps dates onto percentages of a timeline's horizontal span. Bars are
//! clamped to the visible window and dropped when nothing of them remains;
//! point markers are never clamped, only dropped when they fall outside.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{day_diff, PeriodCell, TimelineInstant};

/// Horizontal placement of a bar, both values in percent of the timeline width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarPosition {
    pub offset_percent: f64,
    pub width_percent: f64,
}

impl BarPosition {
    pub fn end_percent(&self) -> f64 {
        self.offset_percent + self.width_percent
    }
}

/// Place a segment on a timeline starting at `timeline_start` and spanning
/// `total_days` days.
///
/// Returns `None` when the clamped segment has no positive width (fully
/// outside the window, zero-length, or inverted) or when `total_days <= 0`.
pub fn position<S, E, T>(
    segment_start: S,
    segment_end: E,
    timeline_start: T,
    total_days: i64,
) -> Option<BarPosition>
where
    S: TimelineInstant,
    E: TimelineInstant,
    T: TimelineInstant,
{
    if total_days <= 0 {
        return None;
    }

    let offset_start = day_diff(timeline_start, segment_start).clamp(0, total_days);
    let offset_end = day_diff(timeline_start, segment_end).clamp(0, total_days);
    let width = offset_end - offset_start;
    if width <= 0 {
        return None;
    }

    let total = total_days as f64;
    Some(BarPosition {
        offset_percent: offset_start as f64 / total * 100.0,
        width_percent: width as f64 / total * 100.0,
    })
}

/// Place a single point in time. Only offsets inside `[0, total_days]` are
/// returned; anything outside is dropped rather than pinned to an edge.
pub fn marker_position<D, T>(date: D, timeline_start: T, total_days: i64) -> Option<f64>
where
    D: TimelineInstant,
    T: TimelineInstant,
{
    if total_days <= 0 {
        return None;
    }

    let offset = day_diff(timeline_start, date);
    if (0..=total_days).contains(&offset) {
        Some(offset as f64 / total_days as f64 * 100.0)
    } else {
        None
    }
}

/// The visible span of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineWindow {
    pub start: NaiveDate,
    pub total_days: i64,
}

impl TimelineWindow {
    pub fn new(start: NaiveDate, total_days: i64) -> Self {
        Self { start, total_days }
    }

    /// Window covering the inclusive range `[start, end]`.
    ///
    /// The extra day makes the last calendar day visible, so period columns
    /// laid out with [`TimelineWindow::column`] add up to exactly 100%.
    pub fn from_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            total_days: ((end - start).num_days() + 1).max(0),
        }
    }

    /// Window spanning a sequence of contiguous cells.
    pub fn from_cells(cells: &[PeriodCell]) -> Option<Self> {
        let first = cells.first()?;
        let last = cells.last()?;
        Some(Self::from_range(first.start, last.end))
    }

    pub fn bar<S: TimelineInstant, E: TimelineInstant>(&self, start: S, end: E) -> Option<BarPosition> {
        position(start, end, self.start, self.total_days)
    }

    pub fn marker<D: TimelineInstant>(&self, date: D) -> Option<f64> {
        marker_position(date, self.start, self.total_days)
    }

    /// Column geometry of a period cell; cell ends are inclusive.
    pub fn column(&self, cell: &PeriodCell) -> Option<BarPosition> {
        let end = cell.end.succ_opt()?;
        self.bar(cell.start, end)
    }

    /// Marker for today's date, if today is on screen.
    pub fn today_marker(&self, today: NaiveDate) -> Option<f64> {
        self.marker(today.instant())
    }
}
