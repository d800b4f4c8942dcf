//! Record normalization from raw API objects to the `Contract` frame
//!
//! The API is loose about types: volumes arrive as strings or numbers,
//! currencies as bare ids or nested objects, timestamps as RFC 3339 or
//! naive strings. Everything is coerced here so the aggregation stage only
//! sees `f64`s, UTC timestamps and resolved symbols.

use crate::currency::CurrencyTable;
use crate::error::{StatsError, StatsResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One contract record as returned by the API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawContract {
    #[serde(default)]
    pub timestamp: Option<TimestampField>,
    #[serde(default)]
    pub volume: Option<NumericField>,
    #[serde(default)]
    pub price: Option<NumericField>,
    #[serde(default)]
    pub premium: Option<NumericField>,
    #[serde(default)]
    pub currency: Option<CurrencyField>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TimestampField {
    Epoch(i64),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CurrencyField {
    Id(i64),
    Text(String),
    Nested {
        #[serde(alias = "currency_id")]
        id: i64,
    },
    Other(serde_json::Value),
}

/// Normalized contract
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contract {
    pub timestamp: DateTime<Utc>,
    pub volume: f64,
    pub price: f64,
    pub premium: f64,
    /// Always 1; summed by the rollups
    pub count: u64,
    pub currency_id: i64,
    /// `None` when the id is not in the lookup table
    pub symbol: Option<String>,
}

impl Contract {
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    fn dedup_key(&self) -> (DateTime<Utc>, Option<String>, u64, u64, u64) {
        (
            self.timestamp,
            self.symbol.clone(),
            self.volume.to_bits(),
            self.price.to_bits(),
            self.premium.to_bits(),
        )
    }
}

/// What to do with a record that cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Fail the whole run on the first bad record
    #[default]
    Abort,
    /// Drop the record and keep going
    Skip,
}

/// Parse, resolve and deduplicate raw records
///
/// Duplicates are exact repeats of `(timestamp, symbol, volume, price,
/// premium)`; the first occurrence wins. The result is in chronological
/// order (stable for equal timestamps).
pub fn normalize(
    raw: &[RawContract],
    table: &CurrencyTable,
    policy: MalformedPolicy,
) -> StatsResult<Vec<Contract>> {
    let mut contracts = Vec::with_capacity(raw.len());
    let mut seen = HashSet::with_capacity(raw.len());
    let mut unknown_ids = HashSet::new();
    let mut skipped = 0usize;
    let mut duplicates = 0usize;

    for (index, record) in raw.iter().enumerate() {
        let contract = match parse_record(index, record, table) {
            Ok(contract) => contract,
            Err(e) => match policy {
                MalformedPolicy::Abort => return Err(e),
                MalformedPolicy::Skip => {
                    log::debug!("Skipping record: {}", e);
                    skipped += 1;
                    continue;
                }
            },
        };

        if contract.symbol.is_none() && unknown_ids.insert(contract.currency_id) {
            log::warn!("Currency id {} not in lookup table", contract.currency_id);
        }

        if !seen.insert(contract.dedup_key()) {
            duplicates += 1;
            continue;
        }

        contracts.push(contract);
    }

    contracts.sort_by_key(|c| c.timestamp);

    if skipped > 0 {
        log::warn!("⚠️  Skipped {} malformed records", skipped);
    }
    log::info!(
        "Normalized {} contracts ({} duplicates removed)",
        contracts.len(),
        duplicates
    );

    Ok(contracts)
}

fn parse_record(index: usize, record: &RawContract, table: &CurrencyTable) -> StatsResult<Contract> {
    let timestamp = parse_timestamp(index, record.timestamp.as_ref())?;
    let volume = parse_number(index, "volume", record.volume.as_ref())?;
    let price = parse_number(index, "price", record.price.as_ref())?;
    let premium = parse_number(index, "premium", record.premium.as_ref())?;
    let currency_id = parse_currency(index, record.currency.as_ref())?;

    if volume < 0.0 {
        return Err(StatsError::malformed(index, "volume", format!("negative volume {}", volume)));
    }

    Ok(Contract {
        timestamp,
        volume,
        price,
        premium,
        count: 1,
        currency_id,
        symbol: table.symbol(currency_id).map(str::to_string),
    })
}

fn parse_timestamp(index: usize, field: Option<&TimestampField>) -> StatsResult<DateTime<Utc>> {
    let parsed = match field {
        None => return Err(StatsError::malformed(index, "timestamp", "missing")),
        Some(TimestampField::Epoch(secs)) => Utc.timestamp_opt(*secs, 0).single(),
        Some(TimestampField::Text(text)) => parse_timestamp_text(text.trim()),
        Some(TimestampField::Other(value)) => {
            return Err(StatsError::malformed(index, "timestamp", format!("unsupported value {}", value)))
        }
    };

    parsed.ok_or_else(|| StatsError::malformed(index, "timestamp", format!("unparseable {:?}", field)))
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn parse_number(index: usize, name: &'static str, field: Option<&NumericField>) -> StatsResult<f64> {
    let value = match field {
        None => return Err(StatsError::malformed(index, name, "missing")),
        Some(NumericField::Number(n)) => Some(*n),
        Some(NumericField::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(NumericField::Other(value)) => {
            return Err(StatsError::malformed(index, name, format!("unsupported value {}", value)))
        }
    };

    match value {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(StatsError::malformed(index, name, format!("not a number: {:?}", field))),
    }
}

fn parse_currency(index: usize, field: Option<&CurrencyField>) -> StatsResult<i64> {
    match field {
        None => Err(StatsError::malformed(index, "currency", "missing")),
        Some(CurrencyField::Id(id)) | Some(CurrencyField::Nested { id }) => Ok(*id),
        Some(CurrencyField::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| StatsError::malformed(index, "currency", format!("not an id: {:?}", text))),
        Some(CurrencyField::Other(value)) => Err(StatsError::malformed(
            index,
            "currency",
            format!("unsupported value {}", value),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawContract {
        serde_json::from_value(value).unwrap()
    }

    fn table() -> CurrencyTable {
        CurrencyTable::from_pairs([(1, "USD"), (2, "EUR")])
    }

    #[test]
    fn test_parse_robosats_style_record() {
        let record = raw(json!({
            "timestamp": "2022-03-01T12:34:56.789012Z",
            "volume": "0.01250000",
            "price": "41234.50",
            "premium": "5.25",
            "fee": "0.002",
            "currency": 2
        }));

        let contracts = normalize(&[record], &table(), MalformedPolicy::Abort).unwrap();
        let c = &contracts[0];

        assert_eq!(c.day(), NaiveDate::from_ymd_opt(2022, 3, 1).unwrap());
        assert_eq!(c.volume, 0.0125);
        assert_eq!(c.price, 41234.5);
        assert_eq!(c.premium, 5.25);
        assert_eq!(c.count, 1);
        assert_eq!(c.symbol.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_nested_currency_and_naive_timestamp() {
        let record = raw(json!({
            "timestamp": "2022-03-01 08:00:00",
            "volume": 0.5,
            "price": 30000,
            "premium": -1,
            "currency": {"id": 1, "name": "US Dollar"}
        }));

        let contracts = normalize(&[record], &table(), MalformedPolicy::Abort).unwrap();
        assert_eq!(contracts[0].currency_id, 1);
        assert_eq!(contracts[0].symbol.as_deref(), Some("USD"));
        assert_eq!(contracts[0].premium, -1.0);
    }

    #[test]
    fn test_unknown_currency_passes_through_without_symbol() {
        let record = raw(json!({
            "timestamp": 1646136000,
            "volume": 1,
            "price": 1,
            "premium": 0,
            "currency": "77"
        }));

        let contracts = normalize(&[record], &table(), MalformedPolicy::Abort).unwrap();
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].currency_id, 77);
        assert_eq!(contracts[0].symbol, None);
    }

    #[test]
    fn test_window_overlap_duplicates_collapse() {
        let record = json!({
            "timestamp": "2022-02-01T10:00:00Z",
            "volume": "0.1",
            "price": 40000,
            "premium": 2.0,
            "currency": 1
        });
        let mut different_price = record.clone();
        different_price["price"] = json!(40001);

        let records = vec![raw(record.clone()), raw(record), raw(different_price)];
        let contracts = normalize(&records, &table(), MalformedPolicy::Abort).unwrap();

        assert_eq!(contracts.len(), 2);
    }

    #[test]
    fn test_output_is_chronological() {
        let records = vec![
            raw(json!({"timestamp": "2022-01-03T00:00:00Z", "volume": 1, "price": 1, "premium": 0, "currency": 1})),
            raw(json!({"timestamp": "2022-01-01T00:00:00Z", "volume": 2, "price": 1, "premium": 0, "currency": 1})),
        ];

        let contracts = normalize(&records, &table(), MalformedPolicy::Abort).unwrap();
        assert_eq!(contracts[0].volume, 2.0);
        assert_eq!(contracts[1].volume, 1.0);
    }

    #[test]
    fn test_malformed_record_aborts_by_default() {
        let records = vec![
            raw(json!({"timestamp": "2022-01-01T00:00:00Z", "volume": 1, "price": 1, "premium": 0, "currency": 1})),
            raw(json!({"timestamp": "yesterday", "volume": 1, "price": 1, "premium": 0, "currency": 1})),
        ];

        let err = normalize(&records, &table(), MalformedPolicy::Abort).unwrap_err();
        assert!(matches!(err, StatsError::Malformed { index: 1, field: "timestamp", .. }));
    }

    #[test]
    fn test_missing_currency_is_malformed() {
        let records = vec![
            raw(json!({"timestamp": "2022-01-01T00:00:00Z", "volume": 1, "price": 1, "premium": 0})),
            raw(json!({"timestamp": "2022-01-01T00:00:00Z", "volume": 1, "price": 1, "premium": 0, "currency": true})),
        ];

        let err = normalize(&records[..1], &table(), MalformedPolicy::Abort).unwrap_err();
        assert!(matches!(err, StatsError::Malformed { index: 0, field: "currency", .. }));

        let err = normalize(&records[1..], &table(), MalformedPolicy::Abort).unwrap_err();
        assert!(matches!(err, StatsError::Malformed { field: "currency", .. }));
    }

    #[test]
    fn test_malformed_records_skipped_when_lenient() {
        let records = vec![
            raw(json!({"timestamp": "2022-01-01T00:00:00Z", "volume": 1, "price": 1, "premium": 0, "currency": 1})),
            raw(json!({"timestamp": "2022-01-01T00:00:00Z", "volume": "lots", "price": 1, "premium": 0, "currency": 1})),
            raw(json!({"timestamp": "2022-01-01T00:00:00Z", "volume": -1, "price": 1, "premium": 0, "currency": 1})),
            raw(json!({"timestamp": "2022-01-01T00:00:00Z", "volume": 1, "premium": 0, "currency": 1})),
        ];

        let contracts = normalize(&records, &table(), MalformedPolicy::Skip).unwrap();
        assert_eq!(contracts.len(), 1);
    }
}
