//! Two-column series handed to the renderer
//!
//! Keys are display strings (ISO dates, "Month Year" labels, currency
//! symbols, weekday names); values are plain `f64`s.

use crate::aggregation::{CumulativeRow, CurrencyRow, DailyRow, DayValue, MonthlyRow, WeekdayRow};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub key: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub key_label: String,
    pub value_label: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(key_label: &str, value_label: &str) -> Self {
        Self {
            key_label: key_label.to_string(),
            value_label: value_label.to_string(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: f64) {
        self.points.push(SeriesPoint {
            key: key.into(),
            value,
        });
    }

    pub fn from_rows<T, F>(key_label: &str, value_label: &str, rows: &[T], point: F) -> Self
    where
        F: Fn(&T) -> (String, f64),
    {
        let mut series = Self::new(key_label, value_label);
        for row in rows {
            let (key, value) = point(row);
            series.push(key, value);
        }
        series
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.points.iter().map(|p| p.key.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn daily_count(rows: &[DailyRow]) -> Self {
        Self::from_rows("date", "count", rows, |r| (r.day.to_string(), r.count as f64))
    }

    pub fn daily_volume(rows: &[DailyRow]) -> Self {
        Self::from_rows("date", "volume", rows, |r| (r.day.to_string(), r.volume))
    }

    pub fn cumulative_count(rows: &[CumulativeRow]) -> Self {
        Self::from_rows("date", "count", rows, |r| (r.day.to_string(), r.count as f64))
    }

    pub fn cumulative_volume(rows: &[CumulativeRow]) -> Self {
        Self::from_rows("date", "volume", rows, |r| (r.day.to_string(), r.volume))
    }

    pub fn day_values(rows: &[DayValue], value_label: &str) -> Self {
        Self::from_rows("date", value_label, rows, |r| (r.day.to_string(), r.value))
    }

    pub fn monthly_count(rows: &[MonthlyRow]) -> Self {
        Self::from_rows("month", "count", rows, |r| (r.label.clone(), r.count as f64))
    }

    pub fn monthly_volume(rows: &[MonthlyRow]) -> Self {
        Self::from_rows("month", "volume", rows, |r| (r.label.clone(), r.volume))
    }

    pub fn currency_volume(rows: &[CurrencyRow]) -> Self {
        Self::from_rows("currency", "volume", rows, |r| (r.symbol.clone(), r.volume))
    }

    pub fn currency_count(rows: &[CurrencyRow]) -> Self {
        Self::from_rows("currency", "count", rows, |r| (r.symbol.clone(), r.count as f64))
    }

    pub fn currency_premium(rows: &[CurrencyRow]) -> Self {
        Self::from_rows("currency", "premium", rows, |r| (r.symbol.clone(), r.premium_mean))
    }

    pub fn weekday_count(rows: &[WeekdayRow]) -> Self {
        Self::from_rows("weekday", "count", rows, |r| (r.weekday.clone(), r.count as f64))
    }

    pub fn weekday_volume(rows: &[WeekdayRow]) -> Self {
        Self::from_rows("weekday", "volume", rows, |r| (r.weekday.clone(), r.volume))
    }
}
