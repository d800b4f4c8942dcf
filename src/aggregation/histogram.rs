//! Per-currency premium distributions
//!
//! Each currency's premiums are trimmed to the 95% of records closest to
//! the median and bucketed into fixed-width bins. Currencies with fewer
//! than 5 records, a range under 0.1, more than 5000 bins or fewer than 3
//! filled bins are skipped.

use super::by_currency::CurrencyRow;
use crate::normalizer::Contract;
use serde::Serialize;
use std::collections::HashMap;

pub const MIN_RECORDS: usize = 5;
pub const KEEP_SHARE: f64 = 0.95;
pub const MIN_RANGE: f64 = 0.1;
pub const BIN_WIDTH: f64 = 0.2;
pub const MIN_FILLED_BINS: usize = 3;
/// Upper bound on bins per chart (a premium range of 1000 points)
pub const MAX_BINS: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramInput {
    pub symbol: String,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Premiums kept after median-distance trimming
    pub values: Vec<f64>,
    pub bins: Vec<HistogramBin>,
}

/// Histogram inputs for every eligible currency, in `ranking` order
pub fn premium_histograms(contracts: &[Contract], ranking: &[CurrencyRow]) -> Vec<HistogramInput> {
    let mut premiums: HashMap<&str, Vec<f64>> = HashMap::new();
    for c in contracts {
        if let Some(symbol) = c.symbol.as_deref() {
            premiums.entry(symbol).or_default().push(c.premium);
        }
    }

    ranking
        .iter()
        .filter_map(|row| {
            let values = premiums.get(row.symbol.as_str())?;
            let histogram = premium_histogram(&row.symbol, values);
            if histogram.is_none() {
                log::debug!("Skipping premium histogram for {} ({} records)", row.symbol, values.len());
            }
            histogram
        })
        .collect()
}

/// Trim and bin one currency's premiums, or `None` when there is too little to show
pub fn premium_histogram(symbol: &str, premiums: &[f64]) -> Option<HistogramInput> {
    if premiums.len() < MIN_RECORDS {
        return None;
    }

    let median = median(premiums);

    let keep = (premiums.len() as f64 * KEEP_SHARE) as usize;
    let mut values = premiums.to_vec();
    values.sort_by(|a, b| (a - median).abs().total_cmp(&(b - median).abs()));
    values.truncate(keep);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max - min < MIN_RANGE {
        return None;
    }

    let span = ((max - min) / BIN_WIDTH).ceil();
    if !span.is_finite() || span > MAX_BINS as f64 {
        log::debug!("Premium range of {} too wide to bin ({} .. {})", symbol, min, max);
        return None;
    }
    let bin_count = (span as usize).max(1);
    let mut counts = vec![0u64; bin_count];
    for v in &values {
        let idx = (((v - min) / BIN_WIDTH).floor() as usize).min(bin_count - 1);
        counts[idx] += 1;
    }

    if counts.iter().filter(|c| **c > 0).count() < MIN_FILLED_BINS {
        return None;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * BIN_WIDTH,
            upper: min + (i + 1) as f64 * BIN_WIDTH,
            count,
        })
        .collect();

    Some(HistogramInput {
        symbol: symbol.to_string(),
        median,
        min,
        max,
        values,
        bins,
    })
}

/// Median with the mean of the two middle values for even lengths
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
