//! Run configuration from environment variables and command-line flags
//!
//! Environment variables (loaded after `.env`) give the defaults; the two
//! command-line flags `-api_url` and `-proxy_url` override them.

use crate::aggregation::MonthBucketPolicy;
use crate::error::{StatsError, StatsResult};
use crate::fetcher::FetchPlan;
use crate::normalizer::MalformedPolicy;
use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_EPOCH: (i32, u32, u32) = (2022, 1, 1);
pub const DEFAULT_WINDOW_DAYS: i64 = 31;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const USAGE: &str = "\
usage: generate_charts [-h] [-api_url API_URL] [-proxy_url PROXY_URL]

options:
  -h, --help            show this help message and exit
  -api_url API_URL      the url of the api
  -proxy_url PROXY_URL  the url of the tor proxy";

/// Configuration for one chart-generation run
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Base endpoint of the statistics API
    pub api_url: Option<String>,

    /// Optional HTTP proxy every request is routed through
    pub proxy_url: Option<String>,

    /// Path of the currency id -> symbol lookup file
    pub currencies_path: PathBuf,

    /// Directory chart artifacts are written to
    pub output_dir: PathBuf,

    /// Fetch in date windows instead of one request
    pub paginate: bool,

    /// First day of the first fetch window
    pub epoch: NaiveDate,

    /// Width of each fetch window in days
    pub window_days: i64,

    /// Per-request timeout
    pub timeout: Duration,

    /// Drop malformed records instead of aborting
    pub skip_malformed: bool,

    /// Keep the (possibly partial) trailing month in monthly charts
    pub keep_partial_month: bool,

    /// Write summary.json next to the charts
    pub write_summary: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl StatsConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `P2P_STATS_API_URL` (no default; `-api_url` may supply it)
    /// - `P2P_STATS_PROXY_URL` (default: none)
    /// - `P2P_STATS_CURRENCIES_PATH` (default: currencies.json)
    /// - `P2P_STATS_OUTPUT_DIR` (default: charts)
    /// - `P2P_STATS_PAGINATE` (default: true)
    /// - `P2P_STATS_EPOCH` (default: 2022-01-01)
    /// - `P2P_STATS_WINDOW_DAYS` (default: 31)
    /// - `P2P_STATS_TIMEOUT_SECS` (default: 60)
    /// - `P2P_STATS_SKIP_MALFORMED` (default: false)
    /// - `P2P_STATS_KEEP_PARTIAL_MONTH` (default: false)
    /// - `P2P_STATS_WRITE_SUMMARY` (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (y, m, d) = DEFAULT_EPOCH;
        let default_epoch = NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

        Self {
            api_url: lookup("P2P_STATS_API_URL").filter(|s| !s.trim().is_empty()),

            proxy_url: lookup("P2P_STATS_PROXY_URL").filter(|s| !s.trim().is_empty()),

            currencies_path: lookup("P2P_STATS_CURRENCIES_PATH")
                .unwrap_or_else(|| "currencies.json".to_string())
                .into(),

            output_dir: lookup("P2P_STATS_OUTPUT_DIR")
                .unwrap_or_else(|| "charts".to_string())
                .into(),

            paginate: lookup("P2P_STATS_PAGINATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),

            epoch: lookup("P2P_STATS_EPOCH")
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
                .unwrap_or(default_epoch),

            window_days: lookup("P2P_STATS_WINDOW_DAYS")
                .and_then(|s| s.parse().ok())
                .filter(|days: &i64| *days > 0)
                .unwrap_or(DEFAULT_WINDOW_DAYS),

            timeout: Duration::from_secs(
                lookup("P2P_STATS_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),

            skip_malformed: lookup("P2P_STATS_SKIP_MALFORMED")
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),

            keep_partial_month: lookup("P2P_STATS_KEEP_PARTIAL_MONTH")
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),

            write_summary: lookup("P2P_STATS_WRITE_SUMMARY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        }
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_args(mut self, args: CliArgs) -> Self {
        if let Some(url) = args.api_url {
            self.api_url = Some(url);
        }
        if let Some(proxy) = args.proxy_url {
            self.proxy_url = Some(proxy);
        }
        self
    }

    /// The endpoint to query; a run without one cannot start
    pub fn require_api_url(&self) -> StatsResult<&str> {
        self.api_url
            .as_deref()
            .ok_or_else(|| StatsError::Config("api url must be set (-api_url or P2P_STATS_API_URL)".to_string()))
    }

    pub fn fetch_plan(&self, today: NaiveDate) -> FetchPlan {
        if self.paginate {
            FetchPlan::Windowed {
                epoch: self.epoch,
                window_days: self.window_days,
                until: today,
            }
        } else {
            FetchPlan::Single
        }
    }

    pub fn malformed_policy(&self) -> MalformedPolicy {
        if self.skip_malformed {
            MalformedPolicy::Skip
        } else {
            MalformedPolicy::Abort
        }
    }

    pub fn month_policy(&self) -> MonthBucketPolicy {
        if self.keep_partial_month {
            MonthBucketPolicy::KeepAll
        } else {
            MonthBucketPolicy::DropPartial
        }
    }
}

/// Flags accepted on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub api_url: Option<String>,
    pub proxy_url: Option<String>,
    pub help: bool,
}

/// Parse `-api_url URL`, `-proxy_url URL` and `-h`
///
/// Double-dash and `flag=value` spellings are accepted as well. Bare
/// words, unknown flags and missing values are rejected with a usage error.
pub fn parse_cli_args<I, S>(args: I) -> StatsResult<CliArgs>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = CliArgs::default();
    let mut iter = args.into_iter().map(Into::into);

    while let Some(arg) = iter.next() {
        let (flag, inline_value) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg.clone(), None),
        };

        let name = flag
            .strip_prefix("--")
            .or_else(|| flag.strip_prefix('-'))
            .filter(|name| !name.starts_with('-'))
            .unwrap_or("");

        let slot = match name {
            "h" | "help" => {
                parsed.help = true;
                continue;
            }
            "api_url" => &mut parsed.api_url,
            "proxy_url" => &mut parsed.proxy_url,
            _ => {
                return Err(StatsError::Config(format!(
                    "unrecognized argument: {}\n{}",
                    arg, USAGE
                )))
            }
        };

        let value = match inline_value {
            Some(value) => value,
            None => iter.next().ok_or_else(|| {
                StatsError::Config(format!("argument {}: expected one argument\n{}", flag, USAGE))
            })?,
        };
        *slot = Some(value);
    }

    Ok(parsed)
}
