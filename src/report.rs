//! Report driver: the fixed chart plan
//!
//! Computes every rollup from the normalized contracts and draws them
//! through a `ChartSink` in a fixed order. Charts whose input is empty
//! (a one-day history, an empty long tail) are skipped, not failed.

use crate::aggregation::{
    average_volume_per_day, cumulative, currency_rollup, daily_rollup, monthly_rollup, premium_histograms,
    rank_monthly, top_by_count, weekday_rollup, weighted_daily_premium, CumulativeRow, CurrencyPartition,
    CurrencyRow, DailyRow, DayValue, HistogramInput, MonthBucketPolicy, MonthMetric, MonthlyRow, WeekdayRow,
    TOP_COUNT_SHARE,
};
use crate::error::StatsResult;
use crate::normalizer::Contract;
use crate::render::{ChartKind, ChartSink, ChartSpec, Series};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub month_policy: MonthBucketPolicy,
}

/// Everything a run produced, serializable as summary.json
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub contract_count: usize,
    pub backend: String,
    /// Charts drawn, in plan order
    pub artifacts: Vec<String>,
    /// Charts left out because their input was empty
    pub skipped: Vec<String>,
    pub daily: Vec<DailyRow>,
    pub cumulative: Vec<CumulativeRow>,
    pub average_volume_per_day: Vec<DayValue>,
    pub monthly: Vec<MonthlyRow>,
    pub currencies: Vec<CurrencyRow>,
    pub partition: CurrencyPartition,
    pub weekdays: Vec<WeekdayRow>,
    pub weighted_premium: Vec<DayValue>,
    pub histograms: Vec<HistogramInput>,
}

impl ReportSummary {
    fn new(contract_count: usize, backend: &str) -> Self {
        Self {
            contract_count,
            backend: backend.to_string(),
            artifacts: Vec::new(),
            skipped: Vec::new(),
            daily: Vec::new(),
            cumulative: Vec::new(),
            average_volume_per_day: Vec::new(),
            monthly: Vec::new(),
            currencies: Vec::new(),
            partition: CurrencyPartition {
                top: Vec::new(),
                tail: Vec::new(),
                total_count: 0,
            },
            weekdays: Vec::new(),
            weighted_premium: Vec::new(),
            histograms: Vec::new(),
        }
    }
}

/// Compute all rollups and draw the chart plan
pub fn generate_report<S>(contracts: &[Contract], sink: &mut S, options: ReportOptions) -> StatsResult<ReportSummary>
where
    S: ChartSink + ?Sized,
{
    log::info!("📊 Rendering charts for {} contracts ({})", contracts.len(), sink.backend_type());
    let mut summary = ReportSummary::new(contracts.len(), sink.backend_type());

    // Daily series
    let daily = daily_rollup(contracts);
    let cum = cumulative(&daily);
    let avg = average_volume_per_day(&daily);

    draw_series(sink, &mut summary, line("contractsPerDay", "Contracts per day", "Date", "Number"), Series::daily_count(&daily))?;
    draw_series(sink, &mut summary, line("volumePerDay", "Traded volume per day (BTC)", "Date", "BTC"), Series::daily_volume(&daily))?;
    draw_series(sink, &mut summary, line("cumulativeVolume", "Cumulative volume (BTC)", "Date", "BTC"), Series::cumulative_volume(&cum))?;
    draw_series(sink, &mut summary, line("cumulativeContracts", "Cumulative num contracts", "Date", "Number"), Series::cumulative_count(&cum))?;
    draw_series(sink, &mut summary, line("averageVolumePerDay", "Average contract size per day (BTC)", "Date", "BTC"), Series::day_values(&avg, "volume"))?;

    // Monthly series
    let monthly = monthly_rollup(contracts, options.month_policy);
    let ranked_by_count = rank_monthly(&monthly, MonthMetric::Count);
    let ranked_by_volume = rank_monthly(&monthly, MonthMetric::Volume);

    draw_series(sink, &mut summary, bar("contractsPerMonth", "Contracts per month", "Month", "Number"), Series::monthly_count(&monthly))?;
    draw_series(sink, &mut summary, bar("volumePerMonth", "Volume per month", "Month", "Volume"), Series::monthly_volume(&monthly))?;
    draw_series(sink, &mut summary, bar("monthsRankedByContracts", "Months ranked by contracts", "Month", "Number"), Series::monthly_count(&ranked_by_count))?;
    draw_series(sink, &mut summary, bar("monthsRankedByVolume", "Months ranked by volume", "Month", "Volume"), Series::monthly_volume(&ranked_by_volume))?;

    // Per-currency series
    let currencies = currency_rollup(contracts);
    let partition = top_by_count(&currencies, TOP_COUNT_SHARE);
    log::info!(
        "   ├─ {} currencies: {} cover 95% of contracts, {} in the long tail",
        currencies.len(),
        partition.top.len(),
        partition.tail.len()
    );

    draw_series(sink, &mut summary, bar("volumePerCurrencyTop", "Volume per currency (top 95% of contracts)", "Currency", "BTC"), Series::currency_volume(&partition.top))?;
    draw_series(sink, &mut summary, bar("volumePerCurrencyTail", "Volume per currency (remaining 5%)", "Currency", "BTC"), Series::currency_volume(&partition.tail))?;
    draw_series(sink, &mut summary, bar("contractsPerCurrencyTop", "Contracts per currency (top 95% of contracts)", "Currency", "Number"), Series::currency_count(&partition.top))?;
    draw_series(sink, &mut summary, bar("contractsPerCurrencyTail", "Contracts per currency (remaining 5%)", "Currency", "Number"), Series::currency_count(&partition.tail))?;
    draw_series(sink, &mut summary, bar("premiumPerCurrencyTop", "Average premium per currency (top 95% of contracts)", "Currency", "Premium (%)"), Series::currency_premium(&partition.top))?;
    draw_series(sink, &mut summary, bar("premiumPerCurrencyTail", "Average premium per currency (remaining 5%)", "Currency", "Premium (%)"), Series::currency_premium(&partition.tail))?;

    // Day of week
    let weekdays = weekday_rollup(contracts);

    draw_series(sink, &mut summary, bar("contractsPerWeekday", "Contracts per day of the week", "Weekday", "Number"), Series::weekday_count(&weekdays))?;
    draw_series(sink, &mut summary, bar("volumePerWeekday", "Volume per day of the week", "Weekday", "BTC"), Series::weekday_volume(&weekdays))?;

    // Premium
    let weighted = weighted_daily_premium(contracts);

    draw_series(sink, &mut summary, line("weightedPremiumPerDay", "Volume-weighted average premium per day", "Date", "Premium (%)"), Series::day_values(&weighted, "premium"))?;

    let histograms = premium_histograms(contracts, &currencies);
    for histogram in &histograms {
        let spec = ChartSpec::new(
            format!("premiumHistogram_{}", histogram.symbol),
            format!("Premium distribution {}", histogram.symbol),
            "Premium (%)",
            "Contracts",
            ChartKind::Histogram,
        );
        sink.draw_histogram(&spec, histogram)?;
        summary.artifacts.push(spec.file_stem);
    }

    log::info!(
        "   └─ {} charts drawn, {} skipped",
        summary.artifacts.len(),
        summary.skipped.len()
    );

    summary.daily = daily;
    summary.cumulative = cum;
    summary.average_volume_per_day = avg;
    summary.monthly = monthly;
    summary.currencies = currencies;
    summary.partition = partition;
    summary.weekdays = weekdays;
    summary.weighted_premium = weighted;
    summary.histograms = histograms;

    Ok(summary)
}

/// Write the summary as pretty JSON to `<dir>/summary.json`
pub fn write_summary(summary: &ReportSummary, dir: &Path) -> StatsResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join("summary.json");
    fs::write(&path, serde_json::to_string_pretty(summary)?)?;
    log::info!("📝 Summary written to {}", path.display());
    Ok(path)
}

fn line(file_stem: &str, title: &str, x_label: &str, y_label: &str) -> ChartSpec {
    ChartSpec::new(file_stem, title, x_label, y_label, ChartKind::Line)
}

fn bar(file_stem: &str, title: &str, x_label: &str, y_label: &str) -> ChartSpec {
    ChartSpec::new(file_stem, title, x_label, y_label, ChartKind::Bar)
}

fn draw_series<S>(sink: &mut S, summary: &mut ReportSummary, spec: ChartSpec, series: Series) -> StatsResult<()>
where
    S: ChartSink + ?Sized,
{
    if series.is_empty() {
        log::debug!("Skipping {}: no data", spec.file_stem);
        summary.skipped.push(spec.file_stem);
        return Ok(());
    }

    sink.draw(&spec, &series)?;
    summary.artifacts.push(spec.file_stem);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::fixtures::contract;
    use crate::render::RecordingSink;

    #[test]
    fn test_empty_input_skips_everything_but_weekdays() {
        let mut sink = RecordingSink::new();
        let summary = generate_report(&[], &mut sink, ReportOptions::default()).unwrap();

        assert_eq!(sink.file_stems(), vec!["contractsPerWeekday", "volumePerWeekday"]);
        assert_eq!(summary.artifacts.len(), 2);
        assert!(summary.skipped.contains(&"contractsPerDay".to_string()));
    }

    #[test]
    fn test_plan_order() {
        let mut contracts = Vec::new();
        for (i, p) in [0.0, 0.5, 1.0, 1.5, 2.0].iter().enumerate() {
            contracts.push(contract((2022, 1, 1 + i as u32), 0, Some("USD"), 1.0, *p));
        }
        contracts.push(contract((2022, 2, 1), 0, Some("EUR"), 0.1, 0.0));

        let mut sink = RecordingSink::new();
        generate_report(&contracts, &mut sink, ReportOptions::default()).unwrap();

        assert_eq!(
            sink.file_stems(),
            vec![
                "contractsPerDay",
                "volumePerDay",
                "cumulativeVolume",
                "cumulativeContracts",
                "averageVolumePerDay",
                "contractsPerMonth",
                "volumePerMonth",
                "monthsRankedByContracts",
                "monthsRankedByVolume",
                "volumePerCurrencyTop",
                "contractsPerCurrencyTop",
                "premiumPerCurrencyTop",
                "contractsPerWeekday",
                "volumePerWeekday",
                "weightedPremiumPerDay",
                "premiumHistogram_USD",
            ]
        );
    }

    #[test]
    fn test_month_rankings_by_count_and_volume() {
        // January: 3 small trades, February: 1 large trade, March: trailing
        let contracts = vec![
            contract((2022, 1, 3), 0, Some("USD"), 0.1, 0.0),
            contract((2022, 1, 4), 0, Some("USD"), 0.1, 0.0),
            contract((2022, 1, 5), 0, Some("USD"), 0.1, 0.0),
            contract((2022, 2, 3), 0, Some("USD"), 5.0, 0.0),
            contract((2022, 3, 1), 0, Some("USD"), 1.0, 0.0),
        ];

        let mut sink = RecordingSink::new();
        generate_report(&contracts, &mut sink, ReportOptions::default()).unwrap();

        let by_count = sink.series("monthsRankedByContracts").unwrap();
        assert_eq!(by_count.keys(), vec!["January 2022", "February 2022"]);
        assert_eq!(by_count.values(), vec![3.0, 1.0]);

        let by_volume = sink.series("monthsRankedByVolume").unwrap();
        assert_eq!(by_volume.keys(), vec!["February 2022", "January 2022"]);
    }

    #[test]
    fn test_summary_serializes() {
        let contracts = vec![
            contract((2022, 1, 1), 0, Some("USD"), 1.0, 2.0),
            contract((2022, 1, 2), 0, Some("EUR"), 1.0, 2.0),
        ];
        let mut sink = RecordingSink::new();
        let summary = generate_report(&contracts, &mut sink, ReportOptions::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = write_summary(&summary, dir.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(json["contract_count"], 2);
        assert_eq!(json["daily"][0]["day"], "2022-01-01");
        assert_eq!(json["backend"], "memory");
    }
}
