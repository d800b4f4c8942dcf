//! p2pstats - charts of peer-to-peer trading activity
//!
//! # Architecture
//!
//! ```text
//! Stats API → fetcher (windowed GETs) → normalizer (parse, resolve, dedup)
//!     ↓
//! aggregation (daily / monthly / currency / weekday / histogram rollups)
//!     ↓
//! report → ChartSink (PlotlyRenderer → *.html) + summary.json
//! ```

pub mod aggregation;
pub mod config;
pub mod currency;
pub mod error;
pub mod fetcher;
pub mod normalizer;
pub mod render;
pub mod report;

pub use config::{parse_cli_args, CliArgs, StatsConfig};
pub use currency::CurrencyTable;
pub use error::{StatsError, StatsResult};
pub use fetcher::{fetch_all, ContractSource, DateWindow, FetchPlan, HttpContractSource};
pub use normalizer::{normalize, Contract, MalformedPolicy, RawContract};
pub use render::{ChartSink, PlotlyRenderer, RecordingSink};
pub use report::{generate_report, write_summary, ReportOptions, ReportSummary};
