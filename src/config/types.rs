//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::TypedValueParser as _;
use clap::{Parser, ValueEnum};

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Report file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One CSV row per input item, with a header row
    Csv,
    /// One JSON object per line
    Jsonl,
}

/// How the resolved address of a domain is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DnsStrategy {
    /// Run `nslookup` and take the last answer address
    Nslookup,
    /// Run `ping -c 1` and take the address echoed on its first line
    Ping,
}

/// Lookup configuration.
///
/// Parsed from the command line by the binary, or built programmatically
/// through `Default`:
///
/// ```no_run
/// use domain_lookup::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("domains.csv"),
///     max_concurrency: 20,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "domain_lookup",
    version,
    about = "Enrich domains with WHOIS, DNS, liveness and geolocation data"
)]
pub struct Config {
    /// File to read identifiers from (first column, one per row); use '-' for stdin
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Report file
    #[arg(long, short = 'o', default_value = "domain_results.csv")]
    pub output: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
    pub format: ReportFormat,

    /// Newline-delimited file of active target URLs handed to the screenshot tool
    #[arg(long, default_value = "urls.txt")]
    pub targets: PathBuf,

    /// Maximum number of items processed concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY, value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    pub max_concurrency: usize,

    /// Pause admission after this many items have been dequeued
    #[arg(long, default_value_t = DEFAULT_THROTTLE_EVERY, value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    pub throttle_every: usize,

    /// Length of the throttle pause in seconds (0 disables throttling)
    #[arg(long, default_value_t = DEFAULT_THROTTLE_PAUSE_SECS)]
    pub throttle_pause_secs: u64,

    /// Timeout of one WHOIS invocation in seconds
    #[arg(long, default_value_t = WHOIS_TIMEOUT_SECS)]
    pub whois_timeout_secs: u64,

    /// Timeout of one name-resolution invocation in seconds
    #[arg(long, default_value_t = DNS_TIMEOUT_SECS)]
    pub dns_timeout_secs: u64,

    /// Timeout of one liveness request in seconds
    #[arg(long, default_value_t = HTTP_PROBE_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,

    /// Timeout of one geolocation request in seconds
    #[arg(long, default_value_t = GEO_TIMEOUT_SECS)]
    pub geo_timeout_secs: u64,

    /// Retries per WHOIS variant, DNS command and geolocation request
    #[arg(long, default_value_t = RETRY_MAX_RETRIES)]
    pub max_retries: usize,

    /// Delay before the first retry in milliseconds (doubled on each retry)
    #[arg(long, default_value_t = RETRY_BASE_DELAY_MS)]
    pub retry_base_delay_ms: u64,

    /// Upper bound for processing one item in seconds
    #[arg(long, default_value_t = ITEM_PROCESSING_TIMEOUT_SECS)]
    pub item_timeout_secs: u64,

    /// How resolved addresses are obtained
    #[arg(long, value_enum, default_value_t = DnsStrategy::Nslookup)]
    pub dns_strategy: DnsStrategy,

    /// Skip the HTTP/HTTPS liveness probe ("active" then means "an IP was resolved")
    #[arg(long)]
    pub no_liveness: bool,

    /// Process duplicate rows instead of keeping only the first occurrence
    #[arg(long)]
    pub keep_duplicates: bool,

    /// Base URL of the geolocation service
    #[arg(long, default_value = DEFAULT_GEO_URL)]
    pub geo_url: String,

    /// WHOIS client executable
    #[arg(long, default_value = DEFAULT_WHOIS_COMMAND)]
    pub whois_cmd: String,

    /// Screenshot executable
    #[arg(long, default_value = DEFAULT_SCREENSHOT_COMMAND)]
    pub screenshot_cmd: String,

    /// Directory the screenshot tool writes into
    #[arg(long, default_value = "screens")]
    pub screenshot_dir: PathBuf,

    /// Timeout of the screenshot tool run in seconds
    #[arg(long, default_value_t = SCREENSHOT_TIMEOUT_SECS)]
    pub screenshot_timeout_secs: u64,

    /// Do not invoke the screenshot tool
    #[arg(long)]
    pub no_screenshots: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Interval of the progress log line in seconds
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL_SECS)]
    pub progress_interval_secs: u64,
}

impl Config {
    /// Timeout of one WHOIS invocation.
    pub fn whois_timeout(&self) -> Duration {
        Duration::from_secs(self.whois_timeout_secs)
    }

    /// Timeout of one name-resolution invocation.
    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_secs)
    }

    /// Timeout of one liveness request.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Timeout of one geolocation request.
    pub fn geo_timeout(&self) -> Duration {
        Duration::from_secs(self.geo_timeout_secs)
    }

    /// Delay before the first retry.
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Upper bound for one item pipeline.
    pub fn item_timeout(&self) -> Duration {
        Duration::from_secs(self.item_timeout_secs)
    }

    /// Length of a throttle pause.
    pub fn throttle_pause(&self) -> Duration {
        Duration::from_secs(self.throttle_pause_secs)
    }

    pub fn screenshot_timeout(&self) -> Duration {
        Duration::from_secs(self.screenshot_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("domains.csv"),
            output: PathBuf::from("domain_results.csv"),
            format: ReportFormat::Csv,
            targets: PathBuf::from("urls.txt"),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            throttle_every: DEFAULT_THROTTLE_EVERY,
            throttle_pause_secs: DEFAULT_THROTTLE_PAUSE_SECS,
            whois_timeout_secs: WHOIS_TIMEOUT_SECS,
            dns_timeout_secs: DNS_TIMEOUT_SECS,
            http_timeout_secs: HTTP_PROBE_TIMEOUT_SECS,
            geo_timeout_secs: GEO_TIMEOUT_SECS,
            max_retries: RETRY_MAX_RETRIES,
            retry_base_delay_ms: RETRY_BASE_DELAY_MS,
            item_timeout_secs: ITEM_PROCESSING_TIMEOUT_SECS,
            dns_strategy: DnsStrategy::Nslookup,
            no_liveness: false,
            keep_duplicates: false,
            geo_url: DEFAULT_GEO_URL.to_string(),
            whois_cmd: DEFAULT_WHOIS_COMMAND.to_string(),
            screenshot_cmd: DEFAULT_SCREENSHOT_COMMAND.to_string(),
            screenshot_dir: PathBuf::from("screens"),
            screenshot_timeout_secs: SCREENSHOT_TIMEOUT_SECS,
            no_screenshots: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            progress_interval_secs: DEFAULT_PROGRESS_INTERVAL_SECS,
        }
    }
}
