use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

/// Length of a calendar day in milliseconds.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Anything that can be placed on a timeline axis.
///
/// Dates are read as local midnight; date-times keep their time of day so the
/// day-difference rounding below applies.
pub trait TimelineInstant: Copy {
    fn instant(self) -> NaiveDateTime;
}

impl TimelineInstant for NaiveDateTime {
    fn instant(self) -> NaiveDateTime {
        self
    }
}

impl TimelineInstant for NaiveDate {
    fn instant(self) -> NaiveDateTime {
        self.and_time(NaiveTime::MIN)
    }
}

impl TimelineInstant for DateTime<Utc> {
    fn instant(self) -> NaiveDateTime {
        self.naive_utc()
    }
}

/// Calendar-day difference from `from` to `to`.
///
/// Ceiling of the millisecond delta over the day length, so an instant later
/// on the same calendar day still counts as one day rather than rounding to
/// zero. Negative when `to` precedes `from`.
pub fn day_diff<A: TimelineInstant, B: TimelineInstant>(from: A, to: B) -> i64 {
    let millis = (to.instant() - from.instant()).num_milliseconds();
    div_ceil(millis, MILLIS_PER_DAY)
}

fn div_ceil(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    if numerator % denominator != 0 && (numerator > 0) == (denominator > 0) {
        quotient + 1
    } else {
        quotient
    }
}

/// Parse a date coming from the data service.
///
/// Accepts RFC 3339 timestamps (converted to UTC), naive ISO date-times and
/// plain `YYYY-MM-DD` dates. Anything else is treated as absent.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(TimelineInstant::instant)
}

/// Serde helper: deserialize an optional date leniently.
///
/// `null`, missing fields, non-string values and unparseable strings all
/// become `None`.
pub fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => parse_date(&s),
        _ => None,
    })
}

/// Serde helper: deserialize a required-looking date that degrades to `None`.
pub fn deserialize_lenient_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient_date(deserializer)?.map(|dt| dt.date()))
}
