//! # Procurement Timeline
//!
//! Projection engine behind the procurement timeline screen.
//!
//! Given a date range, a granularity and a set of line items, the crate
//! computes the period columns of the timeline grid, the horizontal placement
//! of every item's bar, and per-supplier totals per period. All of it is pure
//! and synchronous, so callers simply recompute when their inputs change.
//!
//! ## Architecture
//!
//! - [`models`]: line items, period cells, date parsing and day arithmetic
//! - [`services`]: bucketing, bar positions, grouping, the combined projection,
//!   and the auto-save coalescer
//! - [`config`]: TOML file and environment configuration
//! - [`http`]: Axum-based HTTP surface (feature `http-server`)
//! - [`logging`]: tracing subscriber setup for the server (feature `http-server`)
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use procurement_timeline::models::Granularity;
//! use procurement_timeline::services::{bucket_periods, position, DEFAULT_LOCALE};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
//! let cells = bucket_periods(start, end, Granularity::Monthly, DEFAULT_LOCALE);
//! assert_eq!(cells.len(), 3);
//!
//! let bar = position(
//!     NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
//!     start,
//!     90,
//! )
//! .unwrap();
//! assert!((bar.offset_percent - 44.44).abs() < 0.01);
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(feature = "http-server")]
pub mod logging;

pub use error::{TimelineError, TimelineResult};
