//! Daily rollups and the series derived from them

use crate::normalizer::Contract;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub day: NaiveDate,
    pub count: u64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeRow {
    pub day: NaiveDate,
    pub count: u64,
    pub volume: f64,
}

/// A single per-day value (average trade size, weighted premium)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayValue {
    pub day: NaiveDate,
    pub value: f64,
}

/// Contracts and volume per UTC calendar day, oldest first
///
/// The most recent day is dropped. Days without contracts do not appear.
pub fn daily_rollup(contracts: &[Contract]) -> Vec<DailyRow> {
    let mut days: BTreeMap<NaiveDate, (u64, f64)> = BTreeMap::new();
    for c in contracts {
        let entry = days.entry(c.day()).or_insert((0, 0.0));
        entry.0 += c.count;
        entry.1 += c.volume;
    }

    let mut rows: Vec<DailyRow> = days
        .into_iter()
        .map(|(day, (count, volume))| DailyRow { day, count, volume })
        .collect();
    rows.pop();
    rows
}

/// Running totals of count and volume over the daily series
pub fn cumulative(daily: &[DailyRow]) -> Vec<CumulativeRow> {
    let mut count = 0u64;
    let mut volume = 0.0f64;

    daily
        .iter()
        .map(|row| {
            count += row.count;
            volume += row.volume;
            CumulativeRow {
                day: row.day,
                count,
                volume,
            }
        })
        .collect()
}

/// Mean trade size per day (volume / contracts)
pub fn average_volume_per_day(daily: &[DailyRow]) -> Vec<DayValue> {
    daily
        .iter()
        .filter(|row| row.count > 0)
        .map(|row| DayValue {
            day: row.day,
            value: row.volume / row.count as f64,
        })
        .collect()
}
