use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One column of the timeline grid.
///
/// Both bounds are inclusive calendar dates. Cells for a range are produced by
/// [`crate::services::periods::bucket_periods`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCell {
    /// Month (0-11), quarter (0-3) or ISO week number, depending on granularity
    pub index: u32,
    pub year: i32,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodCell {
    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Locate the cell that contains `date`. Cells are sorted and disjoint.
pub fn find_cell(cells: &[PeriodCell], date: NaiveDate) -> Option<usize> {
    let idx = cells.partition_point(|cell| cell.end < date);
    cells.get(idx).filter(|cell| cell.contains(date)).map(|_| idx)
}
