//! Record Fetcher
//!
//! Pulls raw contract records from the statistics API. The API can be
//! queried in one shot or in fixed-size date windows; windows are issued
//! one after another and their records concatenated in window order.
//!
//! # Window layout
//!
//! ```text
//! epoch ── +31d ──▶ end₀ = start₁ ── +31d ──▶ end₁ = start₂ ... ≥ today
//! ```
//!
//! Adjacent windows share their boundary day, so the same record can come
//! back twice. The normalizer removes those duplicates.

pub mod http;

use crate::error::StatsResult;
use crate::normalizer::RawContract;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

pub use http::HttpContractSource;

/// Query-string date format expected by the API (`DD-MM-YYYY`)
pub const WINDOW_DATE_FORMAT: &str = "%d-%m-%Y";

/// One `start`/`end` request window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn start_param(&self) -> String {
        self.start.format(WINDOW_DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(WINDOW_DATE_FORMAT).to_string()
    }
}

/// How the full history is requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// One request without date parameters
    Single,
    /// Consecutive windows from `epoch` until a window reaches `until`
    Windowed {
        epoch: NaiveDate,
        window_days: i64,
        until: NaiveDate,
    },
}

impl FetchPlan {
    /// Windows to request, in chronological order
    ///
    /// Always yields at least one window for a windowed plan, even when
    /// `epoch` lies after `until`.
    pub fn windows(&self) -> Vec<DateWindow> {
        match *self {
            FetchPlan::Single => Vec::new(),
            FetchPlan::Windowed {
                epoch,
                window_days,
                until,
            } => {
                let step = Duration::days(window_days.max(1));
                let mut windows = Vec::new();
                let mut start = epoch;
                loop {
                    let end = start + step;
                    windows.push(DateWindow { start, end });
                    if end >= until {
                        break;
                    }
                    start = end;
                }
                windows
            }
        }
    }
}

/// Anything that can answer a single records request
#[async_trait]
pub trait ContractSource: Send + Sync {
    /// Fetch the records of one window, or everything when `window` is `None`
    async fn fetch(&self, window: Option<DateWindow>) -> StatsResult<Vec<RawContract>>;

    /// Human-readable origin for logging
    fn describe(&self) -> String;
}

/// Run a fetch plan against a source
///
/// Requests are sequential. The first failing request aborts the whole
/// fetch; records from earlier windows are discarded with it.
pub async fn fetch_all<S>(source: &S, plan: &FetchPlan) -> StatsResult<Vec<RawContract>>
where
    S: ContractSource + ?Sized,
{
    match plan {
        FetchPlan::Single => {
            log::info!("📥 Fetching all contracts from {}", source.describe());
            let records = source.fetch(None).await?;
            log::info!("   └─ {} records", records.len());
            Ok(records)
        }
        FetchPlan::Windowed { .. } => {
            let windows = plan.windows();
            log::info!(
                "📥 Fetching contracts from {} in {} windows",
                source.describe(),
                windows.len()
            );

            let mut records = Vec::new();
            for (i, window) in windows.iter().enumerate() {
                let batch = source.fetch(Some(*window)).await?;
                log::info!(
                    "   ├─ window {}/{} {} → {}: {} records",
                    i + 1,
                    windows.len(),
                    window.start_param(),
                    window.end_param(),
                    batch.len()
                );
                records.extend(batch);
            }

            log::info!("   └─ {} records total", records.len());
            Ok(records)
        }
    }
}
