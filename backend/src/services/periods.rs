//! Period bucketing: splitting a date range into timeline columns.
//!
//! Monthly cells follow calendar months and are clipped to the range bounds.
//! Weekly and quarterly cells are fixed-length steps counted from the range
//! start (7 days, 3 calendar months), with the last cell clipped to the range
//! end. Every step is computed from the range start rather than from the
//! previous cell so month-end clamping never drifts.

use chrono::{Datelike, Days, Locale, Months, NaiveDate, TimeZone, Utc};
use log::debug;

use crate::error::{TimelineError, TimelineResult};
use crate::models::{Granularity, PeriodCell, TimelineInstant};

/// Locale used for labels when the caller does not choose one.
pub const DEFAULT_LOCALE: Locale = Locale::en_US;

/// Parse a locale tag such as `en_US`, `en-US` or `fr_FR`.
pub fn parse_locale(raw: &str) -> TimelineResult<Locale> {
    let normalized = raw.trim().replace('-', "_");
    Locale::try_from(normalized.as_str()).map_err(|_| TimelineError::UnknownLocale(raw.to_string()))
}

/// Partition the inclusive range `[range_start, range_end]` into period cells.
///
/// Returns an empty vector when `range_start >= range_end`.
pub fn bucket_periods(
    range_start: NaiveDate,
    range_end: NaiveDate,
    granularity: Granularity,
    locale: Locale,
) -> Vec<PeriodCell> {
    if range_start >= range_end {
        debug!(
            "Empty period range {} .. {}; no cells generated",
            range_start, range_end
        );
        return Vec::new();
    }

    let cells: Vec<PeriodCell> = match granularity {
        Granularity::Monthly => monthly_cells(range_start, range_end, locale),
        Granularity::Weekly => anchored_cells(range_start, range_end, |n| {
            range_start.checked_add_days(Days::new(7 * n))
        })
        .into_iter()
        .map(|(start, end)| weekly_cell(start, end, locale))
        .collect(),
        Granularity::Quarterly => anchored_cells(range_start, range_end, |n| {
            u32::try_from(3 * n)
                .ok()
                .and_then(|months| range_start.checked_add_months(Months::new(months)))
        })
        .into_iter()
        .map(|(start, end)| quarterly_cell(start, end, locale))
        .collect(),
    };

    debug!(
        "Bucketed {} .. {} into {} {} cells",
        range_start,
        range_end,
        cells.len(),
        granularity
    );
    cells
}

fn monthly_cells(range_start: NaiveDate, range_end: NaiveDate, locale: Locale) -> Vec<PeriodCell> {
    let mut cells = Vec::new();
    let mut month_start = first_of_month(range_start);

    while month_start <= range_end {
        let next_month = month_start.checked_add_months(Months::new(1));
        let month_end = next_month
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX);

        cells.push(PeriodCell {
            index: month_start.month0(),
            year: month_start.year(),
            label: localized(month_start, "%b %Y", locale),
            start: month_start.max(range_start),
            end: month_end.min(range_end),
        });

        match next_month {
            Some(next) => month_start = next,
            None => break,
        }
    }

    cells
}

/// Inclusive `(start, end)` bounds of the steps produced by `step_start(n)`.
fn anchored_cells<F>(range_start: NaiveDate, range_end: NaiveDate, step_start: F) -> Vec<(NaiveDate, NaiveDate)>
where
    F: Fn(u64) -> Option<NaiveDate>,
{
    let mut bounds = Vec::new();
    let mut start = range_start;
    let mut n = 0u64;

    while start <= range_end {
        n += 1;
        let next = step_start(n);
        let end = next
            .and_then(|d| d.pred_opt())
            .map(|d| d.min(range_end))
            .unwrap_or(range_end);
        bounds.push((start, end));

        match next {
            Some(next) => start = next,
            None => break,
        }
    }

    bounds
}

fn weekly_cell(start: NaiveDate, end: NaiveDate, locale: Locale) -> PeriodCell {
    let week = start.iso_week();
    PeriodCell {
        index: week.week(),
        year: week.year(),
        label: localized(start, "%d %b", locale),
        start,
        end,
    }
}

fn quarterly_cell(start: NaiveDate, end: NaiveDate, locale: Locale) -> PeriodCell {
    let quarter = start.month0() / 3;
    let aligned = start.day() == 1 && start.month0() % 3 == 0;
    let label = if aligned {
        format!("Q{} {}", quarter + 1, start.year())
    } else {
        format!(
            "{} - {}",
            localized(start, "%b", locale),
            localized(end, "%b %Y", locale)
        )
    };

    PeriodCell {
        index: quarter,
        year: start.year(),
        label,
        start,
        end,
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn localized(date: NaiveDate, fmt: &str, locale: Locale) -> String {
    Utc.from_utc_datetime(&date.instant())
        .format_localized(fmt, locale)
        .to_string()
}
