//! Run-level fatal conditions and input handling of `run_lookup`.
//!
//! These fail before any lookup is issued, so no external client is needed.

use std::path::PathBuf;

use domain_lookup::input::read_items;
use domain_lookup::{run_lookup, Config};
use tempfile::TempDir;

fn config(dir: &TempDir, file: PathBuf) -> Config {
    Config {
        file,
        output: dir.path().join("report.csv"),
        targets: dir.path().join("urls.txt"),
        no_screenshots: true,
        progress_interval_secs: 0,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = run_lookup(config(&dir, dir.path().join("missing.csv")))
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to open input file"));
    assert!(!dir.path().join("report.csv").exists());
}

#[tokio::test]
async fn test_unwritable_output_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("domains.csv");
    std::fs::write(&input, "URLS\nexample.com\n").unwrap();

    let mut config = config(&dir, input);
    config.output = dir.path().join("no/such/dir/report.csv");
    let err = run_lookup(config).await.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to create output file"));
}

#[tokio::test]
async fn test_input_rows_are_cleaned_and_deduplicated() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("domains.csv");
    std::fs::write(
        &input,
        "URLS\nexample.com\n\n# internal\nhttps://example.com/a\nexample.com\n8.8.8.8\n",
    )
    .unwrap();

    let items = read_items(&input, true).await.unwrap();
    assert_eq!(items, vec!["example.com", "https://example.com/a", "8.8.8.8"]);

    let items = read_items(&input, false).await.unwrap();
    assert_eq!(items.len(), 4);
}
