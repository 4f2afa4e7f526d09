use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::time::deserialize_lenient_date;
use crate::error::TimelineError;

/// A procurement line item placed on the timeline.
///
/// Every field except `id` is optional: records coming from the data service
/// are frequently incomplete, and an item without dates still counts towards
/// grand totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub end: Option<NaiveDateTime>,
    /// Monetary value of the line
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
}

impl TimelineItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            start: None,
            end: None,
            value: None,
            client: None,
            supplier: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_dates(mut self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    /// Value used for summation; absent or non-finite values count as zero.
    pub fn amount(&self) -> f64 {
        match self.value {
            Some(v) if v.is_finite() => v,
            _ => 0.0,
        }
    }

    /// Calendar date used to place the item into a period cell.
    pub fn anchor_date(&self, anchor: PeriodAnchor) -> Option<NaiveDate> {
        match anchor {
            PeriodAnchor::Start => self.start,
            PeriodAnchor::End => self.end,
        }
        .map(|dt| dt.date())
    }

    /// Whether the item matches a free-text search.
    ///
    /// Case-insensitive substring match over name, id, client and supplier.
    /// An empty needle matches everything.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            Some(self.id.as_str()),
            self.name.as_deref(),
            self.client.as_deref(),
            self.supplier.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Width of a period column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(Granularity::Weekly),
            "monthly" | "month" => Ok(Granularity::Monthly),
            "quarterly" | "quarter" => Ok(Granularity::Quarterly),
            _ => Err(TimelineError::UnknownGranularity(s.to_string())),
        }
    }
}

/// Which of an item's dates decides its period cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodAnchor {
    #[default]
    Start,
    End,
}

impl FromStr for PeriodAnchor {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" => Ok(PeriodAnchor::Start),
            "end" => Ok(PeriodAnchor::End),
            _ => Err(TimelineError::UnknownAnchor(s.to_string())),
        }
    }
}
