//! Screenshot hand-off file.

use std::path::Path;

use anyhow::{Context, Result};

/// Writes one URL per line to `path`, replacing any previous file.
pub async fn write_targets(path: &Path, urls: &[String]) -> Result<()> {
    let mut contents = urls.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write targets file: {}", path.display()))
}
