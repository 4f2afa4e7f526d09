//! Timeline projection services.
//!
//! Pure functions for bucketing, bar placement and aggregation, the combined
//! projection built on them, and the auto-save coalescer used by editors.

pub mod autosave;

pub mod checksum;

pub mod grouping;

pub mod periods;

pub mod positions;

pub mod timeline;

pub use autosave::{AutoSaveStats, AutoSaver, Edit, JsonFileSink, SnapshotSink};
pub use grouping::{collate, format_amount, grand_total, group_by, group_rows, total_for, GroupRow, GroupedBucket};
pub use periods::{bucket_periods, parse_locale, DEFAULT_LOCALE};
pub use positions::{marker_position, position, BarPosition, TimelineWindow};
pub use timeline::{project_timeline, RowKey, TimelineProjection, TimelineRequest};
