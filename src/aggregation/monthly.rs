//! Monthly rollups labelled "Month Year"

use crate::normalizer::Contract;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Whether the trailing (usually incomplete) month is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthBucketPolicy {
    #[default]
    DropPartial,
    KeepAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthMetric {
    Count,
    Volume,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub year: i32,
    pub month: u32,
    /// e.g. "March 2022"
    pub label: String,
    pub count: u64,
    pub volume: f64,
}

/// Contracts and volume per calendar month, oldest first
pub fn monthly_rollup(contracts: &[Contract], policy: MonthBucketPolicy) -> Vec<MonthlyRow> {
    let mut months: BTreeMap<(i32, u32), (u64, f64)> = BTreeMap::new();
    for c in contracts {
        let day = c.day();
        let entry = months.entry((day.year(), day.month())).or_insert((0, 0.0));
        entry.0 += c.count;
        entry.1 += c.volume;
    }

    let mut rows: Vec<MonthlyRow> = months
        .into_iter()
        .map(|((year, month), (count, volume))| MonthlyRow {
            year,
            month,
            label: month_label(year, month),
            count,
            volume,
        })
        .collect();

    if policy == MonthBucketPolicy::DropPartial {
        rows.pop();
    }
    rows
}

/// Months ordered from largest to smallest by `metric` (stable)
pub fn rank_monthly(rows: &[MonthlyRow], metric: MonthMetric) -> Vec<MonthlyRow> {
    let mut ranked = rows.to_vec();
    match metric {
        MonthMetric::Count => ranked.sort_by(|a, b| b.count.cmp(&a.count)),
        MonthMetric::Volume => ranked.sort_by(|a, b| b.volume.total_cmp(&a.volume)),
    }
    ranked
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", year, month))
}
