//! Logger setup for runs.
//!
//! Plain lines carry a wall-clock time and a coloured level so a long run can
//! be followed on a terminal; JSON lines carry the same data for log
//! collectors.

use std::io::{self, Write};

use colored::Colorize;
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// HTTP stack crates that stay at `info` whatever `level` is.
const QUIET_MODULES: &[&str] = &["reqwest", "hyper", "hyper_util"];

/// Installs the global logger.
///
/// `RUST_LOG` is read first; `level` then overrides it for this crate and as
/// the global default.
///
/// ```bash
/// domain_lookup domains.csv --log-level debug
/// RUST_LOG=domain_lookup::run=debug domain_lookup domains.csv --log-format json
/// ```
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for module in QUIET_MODULES {
        builder.filter_module(module, LevelFilter::Info);
    }
    builder.filter_module(env!("CARGO_CRATE_NAME"), level);

    match format {
        LogFormat::Plain => builder.format(write_plain),
        LogFormat::Json => builder.format(write_json),
    };

    builder.try_init().map_err(InitializationError::from)
}

fn write_plain(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    let level = match record.level() {
        Level::Error => "ERROR".red().bold(),
        Level::Warn => "WARN ".yellow(),
        Level::Info => "INFO ".green(),
        Level::Debug => "DEBUG".blue(),
        Level::Trace => "TRACE".purple(),
    };
    writeln!(
        buf,
        "{} {} {} {}",
        chrono::Local::now().format("%H:%M:%S"),
        level,
        record.target().dimmed(),
        record.args()
    )
}

fn write_json(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    let line = serde_json::json!({
        "ts": chrono::Utc::now().timestamp_millis(),
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    });
    writeln!(buf, "{line}")
}
