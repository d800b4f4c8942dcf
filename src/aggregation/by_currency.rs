//! Per-currency rollups, volume ranking and the top-95% partition

use crate::normalizer::Contract;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Share of all contracts the "top" currencies must exceed together
pub const TOP_COUNT_SHARE: f64 = 0.95;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyRow {
    pub symbol: String,
    pub volume: f64,
    pub count: u64,
    pub premium_sum: f64,
    pub premium_mean: f64,
}

/// Currencies split into the high-activity set and the long tail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyPartition {
    pub top: Vec<CurrencyRow>,
    pub tail: Vec<CurrencyRow>,
    pub total_count: u64,
}

/// Per-currency totals, ordered by volume descending
///
/// This is the display order of every per-currency chart. Records without
/// a resolved symbol are left out. Equal volumes stay in alphabetical
/// symbol order.
pub fn currency_rollup(contracts: &[Contract]) -> Vec<CurrencyRow> {
    let mut groups: BTreeMap<&str, (f64, u64, f64)> = BTreeMap::new();
    for c in contracts {
        let Some(symbol) = c.symbol.as_deref() else {
            continue;
        };
        let entry = groups.entry(symbol).or_insert((0.0, 0, 0.0));
        entry.0 += c.volume;
        entry.1 += c.count;
        entry.2 += c.premium;
    }

    let mut rows: Vec<CurrencyRow> = groups
        .into_iter()
        .map(|(symbol, (volume, count, premium_sum))| CurrencyRow {
            symbol: symbol.to_string(),
            volume,
            count,
            premium_sum,
            premium_mean: if count > 0 { premium_sum / count as f64 } else { 0.0 },
        })
        .collect();

    rows.sort_by(|a, b| b.volume.total_cmp(&a.volume));
    rows
}

/// Split currencies at the smallest count-ranked prefix exceeding `share`
///
/// Currencies are walked by contract count (descending, stable over the
/// volume ranking) while accumulating a running total. The first prefix
/// whose total is strictly greater than `share * total` is the top set.
/// Both halves are returned in the volume ranking order of `rows`.
pub fn top_by_count(rows: &[CurrencyRow], share: f64) -> CurrencyPartition {
    let total_count: u64 = rows.iter().map(|r| r.count).sum();
    let threshold = share * total_count as f64;

    let mut by_count: Vec<&CurrencyRow> = rows.iter().collect();
    by_count.sort_by(|a, b| b.count.cmp(&a.count));

    let mut running = 0u64;
    let mut cut = by_count.len();
    for (i, row) in by_count.iter().enumerate() {
        running += row.count;
        if running as f64 > threshold {
            cut = i + 1;
            break;
        }
    }

    let top_symbols: HashSet<&str> = by_count[..cut].iter().map(|r| r.symbol.as_str()).collect();
    let (top, tail): (Vec<CurrencyRow>, Vec<CurrencyRow>) = rows
        .iter()
        .cloned()
        .partition(|r| top_symbols.contains(r.symbol.as_str()));

    CurrencyPartition {
        top,
        tail,
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::fixtures::contract;

    fn row(symbol: &str, volume: f64, count: u64) -> CurrencyRow {
        CurrencyRow {
            symbol: symbol.to_string(),
            volume,
            count,
            premium_sum: 0.0,
            premium_mean: 0.0,
        }
    }

    #[test]
    fn test_rollup_ranks_by_volume_and_skips_unresolved() {
        let contracts = vec![
            contract((2022, 1, 1), 0, Some("USD"), 1.0, 4.0),
            contract((2022, 1, 1), 1, Some("USD"), 0.5, 2.0),
            contract((2022, 1, 2), 0, Some("EUR"), 2.0, -3.0),
            contract((2022, 1, 2), 1, None, 50.0, 0.0),
        ];

        let rows = currency_rollup(&contracts);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "EUR");
        assert_eq!(rows[1].symbol, "USD");
        assert_eq!(rows[1].count, 2);
        assert_eq!(rows[1].premium_sum, 6.0);
        assert_eq!(rows[1].premium_mean, 3.0);
        assert!(rows.windows(2).all(|w| w[0].volume >= w[1].volume));
    }

    #[test]
    fn test_partition_is_minimal_prefix_over_share() {
        // 100 contracts total: 60 + 30 = 90 is not enough, 60 + 30 + 6 = 96 is
        let rows = vec![
            row("USD", 10.0, 30),
            row("EUR", 8.0, 60),
            row("GBP", 3.0, 6),
            row("JPY", 2.0, 3),
            row("CHF", 1.0, 1),
        ];

        let partition = top_by_count(&rows, TOP_COUNT_SHARE);

        let top: Vec<&str> = partition.top.iter().map(|r| r.symbol.as_str()).collect();
        let tail: Vec<&str> = partition.tail.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(top, vec!["USD", "EUR", "GBP"]);
        assert_eq!(tail, vec!["JPY", "CHF"]);
        assert_eq!(partition.total_count, 100);

        let top_count: u64 = partition.top.iter().map(|r| r.count).sum();
        assert!(top_count as f64 > 0.95 * 100.0);
        assert!(((top_count - 6) as f64) <= 0.95 * 100.0);
    }

    #[test]
    fn test_exact_share_is_not_enough() {
        // 95 of 100 is not strictly greater than 95%
        let rows = vec![row("USD", 2.0, 95), row("EUR", 1.0, 5)];
        let partition = top_by_count(&rows, TOP_COUNT_SHARE);
        assert_eq!(partition.top.len(), 2);
        assert!(partition.tail.is_empty());
    }

    #[test]
    fn test_equal_volumes_keep_alphabetical_order() {
        let contracts = vec![
            contract((2022, 1, 1), 0, Some("USD"), 1.0, 0.0),
            contract((2022, 1, 1), 1, Some("GBP"), 1.0, 0.0),
            contract((2022, 1, 1), 2, Some("EUR"), 1.0, 0.0),
            contract((2022, 1, 1), 3, Some("JPY"), 3.0, 0.0),
        ];

        let rows = currency_rollup(&contracts);

        let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["JPY", "EUR", "GBP", "USD"]);
    }

    #[test]
    fn test_equal_counts_follow_volume_ranking_at_cut() {
        // 21 contracts, threshold 19.95: A (10) alone is short, A + B (20) crosses
        let rows = vec![row("A", 5.0, 10), row("B", 4.0, 10), row("C", 1.0, 1)];
        let partition = top_by_count(&rows, TOP_COUNT_SHARE);

        let top: Vec<&str> = partition.top.iter().map(|r| r.symbol.as_str()).collect();
        let tail: Vec<&str> = partition.tail.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(top, vec!["A", "B"]);
        assert_eq!(tail, vec!["C"]);

        // 44 contracts, threshold 40.92: GBP (40) plus one of the tied pair.
        // The higher-volume currency of the tie wins.
        let rows = vec![
            row("EUR", 9.0, 2),
            row("USD", 7.0, 2),
            row("GBP", 6.0, 40),
        ];
        let partition = top_by_count(&rows, 0.93);

        let top: Vec<&str> = partition.top.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(top, vec!["EUR", "GBP"]);
        assert_eq!(partition.tail[0].symbol, "USD");
    }

    #[test]
    fn test_empty_input_partitions_to_nothing() {
        let partition = top_by_count(&[], TOP_COUNT_SHARE);
        assert!(partition.top.is_empty());
        assert!(partition.tail.is_empty());
        assert_eq!(partition.total_count, 0);
    }
}
