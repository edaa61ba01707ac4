//! domain_lookup library: concurrent domain enrichment
//!
//! This library enriches a list of domains, URLs and IP addresses with WHOIS
//! registration data, DNS resolution, an HTTP liveness check and IP
//! geolocation, writes one report row per input, and hands the live targets
//! to an external screenshot tool.
//!
//! # Example
//!
//! ```no_run
//! use domain_lookup::{run_lookup, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("domains.csv"),
//!     max_concurrency: 20,
//!     no_screenshots: true,
//!     ..Default::default()
//! };
//!
//! let report = run_lookup(config).await?;
//! println!("Processed {} items, {} active", report.total, report.active);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime and the external `whois` and
//! `nslookup` (or `ping`) clients on `PATH`.

pub mod aggregate;
pub mod config;
pub mod dns;
pub mod domain;
pub mod error_handling;
pub mod export;
pub mod geoip;
pub mod initialization;
pub mod input;
pub mod liveness;
pub mod models;
pub mod process;
pub mod retry;
pub mod run;
pub mod screenshot;
pub mod whois;

// Re-export public API
pub use aggregate::{Aggregator, ResultSet};
pub use config::{Config, DnsStrategy, LogFormat, LogLevel, ReportFormat};
pub use domain::normalize;
pub use error_handling::{LookupError, LookupOutcome};
pub use lookup::{run_lookup, run_lookup_until, LookupReport};
pub use models::{EnrichedRecord, GeoRecord, NormalizedKey, ResolvedAddress, Scheme};
pub use run::{Adapters, Coordinator, CoordinatorOptions, Progress};

// Internal module wiring a full run together
mod lookup {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use log::{info, warn};
    use tokio_util::sync::CancellationToken;

    use crate::config::Config;
    use crate::export::{export_report, write_targets};
    use crate::initialization::init_adapters;
    use crate::input::read_items;
    use crate::process::{CommandRunner, ProcessRunner};
    use crate::run::{print_error_statistics, Coordinator, CoordinatorOptions};
    use crate::screenshot::{ScreenshotOutcome, ScreenshotTool};

    /// Summary of a completed run.
    #[derive(Debug, Clone)]
    pub struct LookupReport {
        /// Items read from the input (one report row each)
        pub total: usize,
        /// Items whose target was handed to the screenshot tool
        pub active: usize,
        /// Items that could not be normalized
        pub invalid: usize,
        /// Whether the run was interrupted before every item was admitted
        pub aborted: bool,
        pub elapsed_seconds: f64,
        /// Report path
        pub output: PathBuf,
        /// Targets file path
        pub targets: PathBuf,
        pub screenshots: ScreenshotOutcome,
    }

    /// Runs a full lookup with the provided configuration.
    ///
    /// Reads the input, enriches every item, writes the report and the
    /// targets file, and runs the screenshot tool.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The input file is missing or unreadable
    /// - The HTTP clients cannot be built
    /// - The report or the targets file cannot be written
    ///
    /// Individual lookup failures never make it fail; they are reported in
    /// the affected rows.
    pub async fn run_lookup(config: Config) -> Result<LookupReport> {
        run_lookup_until(config, CancellationToken::new()).await
    }

    /// Like [`run_lookup`], stopping admission once `shutdown` is cancelled.
    ///
    /// Items never admitted still get a report row flagged as skipped.
    pub async fn run_lookup_until(config: Config, shutdown: CancellationToken) -> Result<LookupReport> {
        let start_time = Instant::now();

        let items = read_items(&config.file, !config.keep_duplicates).await?;

        // Fail before the lookups if the report cannot be written
        std::fs::File::create(&config.output).with_context(|| {
            format!("Failed to create output file: {}", config.output.display())
        })?;

        let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner);
        let adapters = init_adapters(&config, Arc::clone(&runner))
            .context("Failed to initialize lookup adapters")?;

        let coordinator = Coordinator::new(adapters, CoordinatorOptions::from(&config))
            .with_cancellation(shutdown.clone());
        let results = coordinator.run(items).await;
        let aborted = shutdown.is_cancelled();

        print_error_statistics(results.stats());

        let rows = export_report(
            config.format,
            &config.output,
            results.input_order().into_iter(),
        )?;
        info!("Report with {} rows saved to {}", rows, config.output.display());

        let urls = results.target_urls();
        write_targets(&config.targets, &urls).await?;
        info!(
            "{} active targets saved to {}",
            urls.len(),
            config.targets.display()
        );

        let screenshots = if config.no_screenshots {
            ScreenshotOutcome::Skipped
        } else if aborted {
            warn!("Run aborted, skipping screenshots");
            ScreenshotOutcome::Skipped
        } else {
            ScreenshotTool::new(
                runner,
                config.screenshot_cmd.clone(),
                config.screenshot_dir.clone(),
                config.screenshot_timeout(),
            )
            .capture(&config.targets, urls.len())
            .await
        };

        Ok(LookupReport {
            total: results.len(),
            active: urls.len(),
            invalid: results.invalid_count(),
            aborted,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
            output: config.output,
            targets: config.targets,
            screenshots,
        })
    }
}
