//! Screenshot tool invocation.
//!
//! The tool is opaque: it gets the targets file and an output directory, and
//! only its exit status is interpreted.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::process::CommandRunner;

/// How the run of the screenshot tool ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenshotOutcome {
    Succeeded,
    /// Non-zero exit, spawn failure or timeout
    Failed(String),
    /// No active target, nothing to capture
    Skipped,
}

pub struct ScreenshotTool {
    runner: Arc<dyn CommandRunner>,
    program: String,
    output_dir: PathBuf,
    timeout: Duration,
}

impl ScreenshotTool {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        program: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            program: program.into(),
            output_dir: output_dir.into(),
            timeout,
        }
    }

    /// `<tool> -f <targets> --web -d <dir> --no-prompt`
    pub fn arguments(&self, targets_file: &Path) -> Vec<String> {
        vec![
            "-f".to_string(),
            targets_file.display().to_string(),
            "--web".to_string(),
            "-d".to_string(),
            self.output_dir.display().to_string(),
            "--no-prompt".to_string(),
        ]
    }

    /// Captures screenshots of the `target_count` URLs listed in `targets_file`.
    pub async fn capture(&self, targets_file: &Path, target_count: usize) -> ScreenshotOutcome {
        if target_count == 0 {
            info!("No active targets, skipping screenshots");
            return ScreenshotOutcome::Skipped;
        }

        if let Err(e) = tokio::fs::create_dir_all(&self.output_dir).await {
            warn!(
                "Failed to create screenshot directory {}: {}",
                self.output_dir.display(),
                e
            );
            return ScreenshotOutcome::Failed(e.to_string());
        }

        info!(
            "Capturing screenshots of {} targets with {}",
            target_count, self.program
        );
        let args = self.arguments(targets_file);
        match self.runner.run(&self.program, &args, self.timeout).await {
            Ok(output) if output.success => {
                info!("Screenshots saved in {}", self.output_dir.display());
                ScreenshotOutcome::Succeeded
            }
            Ok(output) => {
                let reason = output.stderr.trim().to_string();
                warn!("{} exited with an error: {}", self.program, reason);
                ScreenshotOutcome::Failed(reason)
            }
            Err(e) => {
                warn!("Screenshot capture failed: {}", e);
                ScreenshotOutcome::Failed(e.to_string())
            }
        }
    }
}
