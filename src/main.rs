//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_lookup` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Ctrl-C handling
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

use domain_lookup::initialization::init_logger_with;
use domain_lookup::{run_lookup_until, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // First Ctrl-C stops admission; in-flight items finish or time out
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, no new items will be started");
            signal_token.cancel();
        }
    });

    match run_lookup_until(config, shutdown).await {
        Ok(report) => {
            println!(
                "✅ Processed {} item{} ({} active, {} invalid) in {:.1}s{}",
                report.total,
                if report.total == 1 { "" } else { "s" },
                report.active,
                report.invalid,
                report.elapsed_seconds,
                if report.aborted { " - run aborted" } else { "" }
            );
            println!("Results saved in {}", report.output.display());
            println!("Active targets saved in {}", report.targets.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("domain_lookup error: {:#}", e);
            process::exit(1);
        }
    }
}
