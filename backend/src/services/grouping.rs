//! Supplier/period aggregation.
//!
//! Items are partitioned by a secondary key (usually the supplier) and by the
//! period cell containing their anchor date. Output is dense: every key gets
//! one bucket per cell, so rows line up with the column grid even where a
//! supplier has nothing in a period.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::debug;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{find_cell, PeriodAnchor, PeriodCell, TimelineItem};

/// Row label used for items without a grouping key.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// Aggregate of one (key, period cell) pair.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedBucket<'a> {
    pub key: Option<String>,
    /// Position of the cell in the slice passed to the grouping call
    pub cell_index: usize,
    pub total: f64,
    /// Contributing items, in input order
    pub items: Vec<&'a TimelineItem>,
}

/// All buckets for one key, plus the items that landed in no cell.
#[derive(Debug, Clone, Serialize)]
pub struct GroupRow<'a> {
    pub key: Option<String>,
    pub buckets: Vec<GroupedBucket<'a>>,
    /// Items whose anchor date is missing
    pub undated: Vec<&'a TimelineItem>,
    /// Items dated outside every cell
    pub out_of_range: Vec<&'a TimelineItem>,
}

impl GroupRow<'_> {
    pub fn label(&self) -> &str {
        self.key.as_deref().unwrap_or(UNASSIGNED_LABEL)
    }

    /// Sum of the per-period totals; undated and out-of-range items are excluded.
    pub fn group_total(&self) -> f64 {
        self.buckets.iter().map(|b| b.total).sum()
    }

    pub fn item_count(&self) -> usize {
        self.buckets.iter().map(|b| b.items.len()).sum::<usize>()
            + self.undated.len()
            + self.out_of_range.len()
    }
}

/// Sum of an item slice's values, regardless of dates.
pub fn grand_total<'a, I>(items: I) -> f64
where
    I: IntoIterator<Item = &'a TimelineItem>,
{
    items.into_iter().map(TimelineItem::amount).sum()
}

/// Recompute a bucket's total from its items.
pub fn total_for(bucket: &GroupedBucket<'_>) -> f64 {
    grand_total(bucket.items.iter().copied())
}

/// Key function grouping by supplier.
pub fn supplier_key(item: &TimelineItem) -> Option<String> {
    item.supplier.clone()
}

/// Key function grouping by client.
pub fn client_key(item: &TimelineItem) -> Option<String> {
    item.client.clone()
}

/// Flat list of buckets ordered by key, then by cell. Items are placed by
/// their start date.
pub fn group_by<'a, F>(items: &'a [TimelineItem], key_fn: F, cells: &[PeriodCell]) -> Vec<GroupedBucket<'a>>
where
    F: Fn(&TimelineItem) -> Option<String>,
{
    group_rows(items, key_fn, cells, PeriodAnchor::Start)
        .into_iter()
        .flat_map(|row| row.buckets)
        .collect()
}

/// Group items into one row per key.
///
/// Keys are trimmed; blank keys count as missing. Rows are ordered with
/// [`collate`], missing key last.
pub fn group_rows<'a, F>(
    items: &'a [TimelineItem],
    key_fn: F,
    cells: &[PeriodCell],
    anchor: PeriodAnchor,
) -> Vec<GroupRow<'a>>
where
    F: Fn(&TimelineItem) -> Option<String>,
{
    let mut rows: HashMap<Option<String>, GroupRow<'a>> = HashMap::new();

    for item in items {
        let key = key_fn(item)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let row = rows.entry(key.clone()).or_insert_with(|| GroupRow {
            buckets: (0..cells.len())
                .map(|cell_index| GroupedBucket {
                    key: key.clone(),
                    cell_index,
                    total: 0.0,
                    items: Vec::new(),
                })
                .collect(),
            key,
            undated: Vec::new(),
            out_of_range: Vec::new(),
        });

        match item.anchor_date(anchor) {
            None => row.undated.push(item),
            Some(date) => match find_cell(cells, date) {
                Some(idx) => {
                    let bucket = &mut row.buckets[idx];
                    bucket.total += item.amount();
                    bucket.items.push(item);
                }
                None => row.out_of_range.push(item),
            },
        }
    }

    let mut rows: Vec<GroupRow<'a>> = rows.into_values().collect();
    rows.sort_by(|a, b| compare_keys(a.key.as_deref(), b.key.as_deref()));

    debug!(
        "Grouped {} items into {} rows across {} cells",
        items.len(),
        rows.len(),
        cells.len()
    );
    rows
}

fn compare_keys(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => collate(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// User-facing string ordering.
///
/// Names are compared by their base letters first: NFD decomposition with
/// combining marks removed, then lowercased, so `Ångström` sorts with the
/// `A`s and `acme` sits next to `Acme`. Ties fall back to the raw text so
/// the order is total.
pub fn collate(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b)).then_with(|| a.cmp(b))
}

fn sort_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Two-decimal display with thousands separators, e.g. `-1,234.50`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
