//! Tests for command-line parsing of `Config`.

use clap::Parser;
use domain_lookup::config::{DEFAULT_GEO_URL, DEFAULT_MAX_CONCURRENCY};
use domain_lookup::{Config, DnsStrategy, ReportFormat};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_defaults_from_cli() {
    let config = Config::try_parse_from(["domain_lookup", "domains.csv"]).unwrap();
    assert_eq!(config.file, PathBuf::from("domains.csv"));
    assert_eq!(config.output, PathBuf::from("domain_results.csv"));
    assert_eq!(config.targets, PathBuf::from("urls.txt"));
    assert_eq!(config.format, ReportFormat::Csv);
    assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    assert_eq!(config.dns_strategy, DnsStrategy::Nslookup);
    assert_eq!(config.geo_url, DEFAULT_GEO_URL);
    assert_eq!(config.whois_timeout(), Duration::from_secs(10));
    assert_eq!(config.http_timeout(), Duration::from_secs(5));
    assert!(!config.no_liveness);
    assert!(!config.keep_duplicates);
}

#[test]
fn test_stdin_and_overrides() {
    let config = Config::try_parse_from([
        "domain_lookup",
        "-",
        "--format",
        "jsonl",
        "-o",
        "out.jsonl",
        "--max-concurrency",
        "25",
        "--dns-strategy",
        "ping",
        "--no-liveness",
        "--no-screenshots",
        "--max-retries",
        "5",
    ])
    .unwrap();
    assert_eq!(config.file, PathBuf::from("-"));
    assert_eq!(config.format, ReportFormat::Jsonl);
    assert_eq!(config.output, PathBuf::from("out.jsonl"));
    assert_eq!(config.max_concurrency, 25);
    assert_eq!(config.dns_strategy, DnsStrategy::Ping);
    assert_eq!(config.max_retries, 5);
    assert!(config.no_liveness);
    assert!(config.no_screenshots);
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(Config::try_parse_from(["domain_lookup", "d.csv", "--max-concurrency", "0"]).is_err());
    assert!(Config::try_parse_from(["domain_lookup", "d.csv", "--throttle-every", "0"]).is_err());
    assert!(Config::try_parse_from(["domain_lookup", "d.csv", "--format", "xlsx"]).is_err());
    assert!(Config::try_parse_from(["domain_lookup"]).is_err());
}
