//! Child-process execution with a hard timeout.
//!
//! Every external command of the pipeline (WHOIS client, resolver, ping,
//! screenshot tool) goes through `CommandRunner`, so each one is an async
//! unit that cannot outlive its timeout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;

use crate::error_handling::LookupError;

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status 0
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// stdout followed by stderr, for signature matching.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Runs an external program.
///
/// Implementations must return within `timeout` and map every failure
/// (spawn error, timeout) into a `LookupError`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, LookupError>;
}

/// `CommandRunner` backed by `tokio::process`.
///
/// The child is killed when the timeout fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, LookupError> {
        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        log::trace!("Running {} {}", program, args.join(" "));

        let output = tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| LookupError::Timeout(timeout))?
            .map_err(|e| LookupError::Transport(format!("failed to run {program}: {e}")))?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
