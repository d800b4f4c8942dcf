//! Aggregation Engine
//!
//! Pure rollups over the normalized contract frame. Nothing here mutates
//! its input; every function borrows `&[Contract]` (or a rollup computed
//! from it) and returns a fresh table.
//!
//! # Derivations
//!
//! ```text
//! contracts ─┬─▶ daily_rollup ──┬─▶ cumulative
//!            │                  └─▶ average_volume_per_day
//!            ├─▶ weighted_daily_premium
//!            ├─▶ monthly_rollup ───▶ rank_monthly
//!            ├─▶ currency_rollup ──┬─▶ top_by_count (top / tail)
//!            │                     └─▶ premium_histograms
//!            └─▶ weekday_rollup
//! ```
//!
//! Time-bucketed series drop their most recent bucket: that day (or month)
//! is usually still in progress and would plot artificially low.

pub mod by_currency;
pub mod daily;
pub mod histogram;
pub mod monthly;
pub mod premium;
pub mod weekday;

pub use by_currency::{currency_rollup, top_by_count, CurrencyPartition, CurrencyRow, TOP_COUNT_SHARE};
pub use daily::{average_volume_per_day, cumulative, daily_rollup, CumulativeRow, DailyRow, DayValue};
pub use histogram::{premium_histogram, premium_histograms, HistogramBin, HistogramInput};
pub use monthly::{monthly_rollup, rank_monthly, MonthBucketPolicy, MonthMetric, MonthlyRow};
pub use premium::weighted_daily_premium;
pub use weekday::{weekday_rollup, WeekdayRow};
