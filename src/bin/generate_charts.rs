//! Chart generator - fetch, aggregate and plot P2P trading statistics
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin generate_charts -- -api_url http://<host>/api/ticks/ -proxy_url http://127.0.0.1:8118
//! ```
//!
//! ## Environment Variables
//!
//! - P2P_STATS_API_URL - Statistics endpoint (overridden by -api_url)
//! - P2P_STATS_PROXY_URL - HTTP proxy (overridden by -proxy_url)
//! - P2P_STATS_CURRENCIES_PATH - Currency lookup file (default: currencies.json)
//! - P2P_STATS_OUTPUT_DIR - Chart output directory (default: charts)
//! - P2P_STATS_PAGINATE - Fetch in date windows (default: true)
//! - P2P_STATS_EPOCH - First window start, YYYY-MM-DD (default: 2022-01-01)
//! - P2P_STATS_WINDOW_DAYS - Window width in days (default: 31)
//! - P2P_STATS_TIMEOUT_SECS - Per-request timeout (default: 60)
//! - P2P_STATS_SKIP_MALFORMED - Skip unparseable records instead of aborting (default: false)
//! - P2P_STATS_KEEP_PARTIAL_MONTH - Keep the current month in monthly charts (default: false)
//! - P2P_STATS_WRITE_SUMMARY - Write summary.json (default: true)
//! - RUST_LOG - Logging level (optional, default: info)

use chrono::Utc;
use p2pstats::config::USAGE;
use p2pstats::{
    fetch_all, generate_report, normalize, parse_cli_args, write_summary, CurrencyTable, HttpContractSource,
    PlotlyRenderer, ReportOptions, StatsConfig,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let args = parse_cli_args(env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = StatsConfig::from_env().with_args(args);
    let api_url = config.require_api_url()?;
    let today = Utc::now().date_naive();
    let plan = config.fetch_plan(today);

    log::info!("🚀 Starting P2P stats chart generation");
    log::info!("   ├─ API: {}", api_url);
    log::info!("   ├─ Proxy: {}", config.proxy_url.as_deref().unwrap_or("none"));
    log::info!("   ├─ Currencies: {}", config.currencies_path.display());
    if config.paginate {
        log::info!("   ├─ Windows: {} days from {}", config.window_days, config.epoch);
    } else {
        log::info!("   ├─ Windows: disabled (single request)");
    }
    log::info!("   ├─ Timeout: {}s", config.timeout.as_secs());
    log::info!("   ├─ Malformed records: {:?}", config.malformed_policy());
    log::info!("   └─ Output: {}", config.output_dir.display());

    let table = CurrencyTable::load(&config.currencies_path)?;

    let source = HttpContractSource::new(api_url, config.proxy_url.as_deref(), config.timeout)?;
    let raw = fetch_all(&source, &plan).await?;

    let contracts = normalize(&raw, &table, config.malformed_policy())?;

    let mut renderer = PlotlyRenderer::new(&config.output_dir)?;
    let options = ReportOptions {
        month_policy: config.month_policy(),
    };
    let summary = generate_report(&contracts, &mut renderer, options)?;

    if config.write_summary {
        write_summary(&summary, renderer.output_dir())?;
    }

    log::info!(
        "✅ Done: {} charts in {}",
        renderer.written().len(),
        renderer.output_dir().display()
    );

    Ok(())
}
