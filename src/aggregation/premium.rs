//! Volume-weighted daily premium

use super::daily::DayValue;
use crate::normalizer::Contract;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// `sum(premium * volume) / sum(volume)` per day, oldest first
///
/// The most recent day is dropped like every daily series. A day whose
/// total volume is zero has no defined weighted mean and is left out.
pub fn weighted_daily_premium(contracts: &[Contract]) -> Vec<DayValue> {
    let mut days: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for c in contracts {
        let entry = days.entry(c.day()).or_insert((0.0, 0.0));
        entry.0 += c.premium * c.volume;
        entry.1 += c.volume;
    }

    let mut rows: Vec<(NaiveDate, (f64, f64))> = days.into_iter().collect();
    rows.pop();

    rows.into_iter()
        .filter(|(_, (_, volume))| *volume > 0.0)
        .map(|(day, (weighted, volume))| DayValue {
            day,
            value: weighted / volume,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::fixtures::contract;

    #[test]
    fn test_weighted_by_volume_not_simple_mean() {
        let contracts = vec![
            contract((2022, 1, 1), 0, Some("USD"), 1.0, 10.0),
            contract((2022, 1, 1), 1, Some("EUR"), 3.0, 0.0),
            contract((2022, 1, 2), 0, Some("USD"), 1.0, 99.0),
        ];

        let rows = weighted_daily_premium(&contracts);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].day, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(rows[0].value, 2.5);
    }

    #[test]
    fn test_zero_volume_day_is_omitted() {
        let contracts = vec![
            contract((2022, 1, 1), 0, Some("USD"), 0.0, 10.0),
            contract((2022, 1, 2), 0, Some("USD"), 1.0, 4.0),
            contract((2022, 1, 3), 0, Some("USD"), 1.0, 0.0),
        ];

        let rows = weighted_daily_premium(&contracts);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 4.0);
    }

    #[test]
    fn test_input_is_left_untouched() {
        let contracts = vec![
            contract((2022, 1, 1), 0, Some("USD"), 2.0, 3.0),
            contract((2022, 1, 2), 0, Some("USD"), 1.0, 1.0),
        ];
        let before = contracts.clone();

        let _ = weighted_daily_premium(&contracts);

        assert_eq!(contracts, before);
    }
}
