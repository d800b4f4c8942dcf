//! Activity per day of the week

use crate::normalizer::Contract;
use chrono::{Datelike, Weekday};
use serde::Serialize;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayRow {
    pub weekday: String,
    pub count: u64,
    pub volume: f64,
}

/// Seven rows, Monday through Sunday; weekdays without contracts are zero
pub fn weekday_rollup(contracts: &[Contract]) -> Vec<WeekdayRow> {
    let mut totals = [(0u64, 0.0f64); 7];
    for c in contracts {
        let slot = &mut totals[c.timestamp.weekday().num_days_from_monday() as usize];
        slot.0 += c.count;
        slot.1 += c.volume;
    }

    WEEK.iter()
        .zip(totals)
        .map(|(day, (count, volume))| WeekdayRow {
            weekday: weekday_name(*day).to_string(),
            count,
            volume,
        })
        .collect()
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
