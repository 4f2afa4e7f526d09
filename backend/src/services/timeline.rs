//! Full timeline projection.
//!
//! Combines bucketing, bar placement and grouping into the single payload a
//! timeline screen renders. Recompute whenever any input changes; the result
//! carries a fingerprint of its inputs for callers that want to memoise.

use chrono::{Locale, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use super::checksum::fingerprint;
use super::grouping::{client_key, format_amount, grand_total, group_rows, supplier_key, GroupRow};
use super::periods::bucket_periods;
use super::positions::{BarPosition, TimelineWindow};
use crate::models::{deserialize_lenient_day, Granularity, PeriodAnchor, PeriodCell, TimelineItem};

/// Secondary dimension used for timeline rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKey {
    #[default]
    Supplier,
    Client,
}

/// Inputs of a projection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineRequest {
    #[serde(default, deserialize_with = "deserialize_lenient_day")]
    pub range_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_day")]
    pub range_end: Option<NaiveDate>,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default)]
    pub anchor: PeriodAnchor,
    #[serde(default)]
    pub row_key: RowKey,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_day")]
    pub today: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<TimelineItem>,
}

/// A period cell together with its column geometry.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodColumn {
    #[serde(flatten)]
    pub cell: PeriodCell,
    pub days: i64,
    pub position: Option<BarPosition>,
}

/// Placement of one item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemBar {
    pub item_id: String,
    pub name: Option<String>,
    pub bar: Option<BarPosition>,
    pub start_marker: Option<f64>,
    pub end_marker: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodTotal {
    pub cell_index: usize,
    pub total: f64,
    pub formatted_total: String,
    pub item_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowSummary {
    pub key: Option<String>,
    pub label: String,
    pub total: f64,
    pub formatted_total: String,
    pub periods: Vec<PeriodTotal>,
    pub undated_item_ids: Vec<String>,
    pub out_of_range_item_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionCounts {
    pub total_items: usize,
    pub matched_items: usize,
    pub positioned_items: usize,
    pub undated_items: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineProjection {
    pub granularity: Granularity,
    pub window: Option<TimelineWindow>,
    pub columns: Vec<PeriodColumn>,
    pub bars: Vec<ItemBar>,
    pub rows: Vec<RowSummary>,
    pub today_marker: Option<f64>,
    pub grand_total: f64,
    pub formatted_grand_total: String,
    pub counts: ProjectionCounts,
    pub fingerprint: String,
}

/// Compute the projection for `request`, labelling periods in `locale`.
///
/// A missing or inverted range yields no columns and no bars; rows and the
/// grand total are still computed from the matching items.
pub fn project_timeline(request: &TimelineRequest, locale: Locale) -> TimelineProjection {
    let cells = match (request.range_start, request.range_end) {
        (Some(start), Some(end)) => bucket_periods(start, end, request.granularity, locale),
        _ => Vec::new(),
    };
    let window = TimelineWindow::from_cells(&cells);

    let search = request.search.as_deref().unwrap_or("");
    let matched: Vec<TimelineItem> = request
        .items
        .iter()
        .filter(|item| item.matches_search(search))
        .cloned()
        .collect();

    let bars: Vec<ItemBar> = matched.iter().map(|item| item_bar(item, window.as_ref())).collect();

    let key_fn: fn(&TimelineItem) -> Option<String> = match request.row_key {
        RowKey::Supplier => supplier_key,
        RowKey::Client => client_key,
    };
    let rows: Vec<RowSummary> = group_rows(&matched, key_fn, &cells, request.anchor)
        .iter()
        .map(summarize_row)
        .collect();

    let columns: Vec<PeriodColumn> = cells
        .into_iter()
        .map(|cell| PeriodColumn {
            days: cell.days(),
            position: window.as_ref().and_then(|w| w.column(&cell)),
            cell,
        })
        .collect();

    let counts = ProjectionCounts {
        total_items: request.items.len(),
        matched_items: matched.len(),
        positioned_items: bars.iter().filter(|b| b.bar.is_some()).count(),
        undated_items: matched
            .iter()
            .filter(|i| i.start.is_none() || i.end.is_none())
            .count(),
    };

    let total = grand_total(&matched);
    let locale_tag = format!("{:?}", locale);

    debug!(
        "Projected {} of {} items ({} positioned) for {:?}..{:?}",
        counts.matched_items, counts.total_items, counts.positioned_items, request.range_start, request.range_end
    );

    TimelineProjection {
        granularity: request.granularity,
        window,
        columns,
        bars,
        rows,
        today_marker: match (window, request.today) {
            (Some(w), Some(today)) => w.today_marker(today),
            _ => None,
        },
        grand_total: total,
        formatted_grand_total: format_amount(total),
        counts,
        fingerprint: fingerprint(request, &[&locale_tag]),
    }
}

fn item_bar(item: &TimelineItem, window: Option<&TimelineWindow>) -> ItemBar {
    let (bar, start_marker, end_marker) = match window {
        Some(w) => (
            match (item.start, item.end) {
                (Some(start), Some(end)) => w.bar(start, end),
                _ => None,
            },
            item.start.and_then(|s| w.marker(s)),
            item.end.and_then(|e| w.marker(e)),
        ),
        None => (None, None, None),
    };

    ItemBar {
        item_id: item.id.clone(),
        name: item.name.clone(),
        bar,
        start_marker,
        end_marker,
    }
}

fn summarize_row(row: &GroupRow<'_>) -> RowSummary {
    let ids = |items: &[&TimelineItem]| items.iter().map(|i| i.id.clone()).collect::<Vec<_>>();
    let total = row.group_total();

    RowSummary {
        key: row.key.clone(),
        label: row.label().to_string(),
        total,
        formatted_total: format_amount(total),
        periods: row
            .buckets
            .iter()
            .map(|b| PeriodTotal {
                cell_index: b.cell_index,
                total: b.total,
                formatted_total: format_amount(b.total),
                item_ids: ids(&b.items),
            })
            .collect(),
        undated_item_ids: ids(&row.undated),
        out_of_range_item_ids: ids(&row.out_of_range),
    }
}
