//! Construction and execution of the external avrdude command.
//!
//! One invocation is exactly one process execution attempt: no retry and
//! no kill path — once spawned, avrdude runs to completion. The runner
//! never lets an error escape its task; every failure mode is converted
//! into a [`FlashOutcome`] so the guard is always released afterwards.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::config::FlashConfig;
use crate::models::AppEvent;
use crate::services::OutputRelay;

/// The fully resolved argument list for one flash attempt. Immutable
/// once built.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub firmware: PathBuf,
}

impl CommandSpec {
    /// Builds the avrdude invocation for writing `firmware` through
    /// `port`: `avrdude -c <programmer> -P <port> -p <part> -b <baud>
    /// -U flash:w:<firmware>:i -V`.
    pub fn avrdude(avrdude: &Path, port: &str, firmware: &Path, config: &FlashConfig) -> Self {
        let args = vec![
            "-c".to_string(),
            config.programmer.clone(),
            "-P".to_string(),
            port.to_string(),
            "-p".to_string(),
            config.part.clone(),
            "-b".to_string(),
            config.baud_rate.to_string(),
            "-U".to_string(),
            format!("flash:w:{}:i", firmware.display()),
            "-V".to_string(),
        ];
        Self {
            program: avrdude.to_path_buf(),
            args,
            firmware: firmware.to_path_buf(),
        }
    }

    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Terminal outcome of one flash attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashOutcome {
    Success,
    /// avrdude exited with a non-zero code. A normal outcome, not an
    /// exceptional one.
    Failure(i32),
    /// The process could not be launched or its output could not be
    /// read; nothing useful happened.
    LaunchError(String),
}

impl FlashOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FlashOutcome::Success)
    }
}

pub struct FlashRunner;

impl FlashRunner {
    /// Runs one flash attempt end to end, streaming output into `relay`
    /// line by line as it arrives. Always pushes a closing banner after
    /// the last streamed line, whatever the outcome.
    pub async fn run(spec: &CommandSpec, relay: &Arc<OutputRelay>) -> FlashOutcome {
        let outcome = match Self::execute(spec, relay).await {
            Ok(outcome) => outcome,
            Err(e) => {
                relay.push(format!("Error: {e:#}"));
                FlashOutcome::LaunchError(format!("{e:#}"))
            }
        };

        relay.push(String::new());
        relay.push("=".repeat(40));
        match &outcome {
            FlashOutcome::Success => relay.push("✅ Flash completed successfully"),
            FlashOutcome::Failure(code) => relay.push(format!("❌ Flash failed (exit code {code})")),
            FlashOutcome::LaunchError(reason) => relay.push(format!("❌ Flash aborted: {reason}")),
        }

        outcome
    }

    async fn execute(spec: &CommandSpec, relay: &Arc<OutputRelay>) -> Result<FlashOutcome> {
        // Both paths are checked at execution time, not earlier, and the
        // diagnostics name the concrete resolved locations so the
        // operator can fix placement.
        if !spec.program.exists() {
            relay.push(format!(
                "Error: avrdude executable not found at {}",
                spec.program.display()
            ));
            relay.push("Place avrdude next to this program or pass --avrdude.".to_string());
            return Ok(FlashOutcome::LaunchError(format!(
                "missing executable: {}",
                spec.program.display()
            )));
        }
        if !spec.firmware.exists() {
            relay.push(format!(
                "Error: firmware file not found at {}",
                spec.firmware.display()
            ));
            return Ok(FlashOutcome::LaunchError(format!(
                "missing firmware file: {}",
                spec.firmware.display()
            )));
        }

        log::debug!("spawning: {}", spec.command_line());

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start {}", spec.program.display()))?;

        let stdout = child.stdout.take().context("child stdout was not captured")?;
        let stderr = child.stderr.take().context("child stderr was not captured")?;

        let stdout_task = tokio::spawn(relay_lines(stdout, Arc::clone(relay)));
        let stderr_task = tokio::spawn(relay_lines(stderr, Arc::clone(relay)));

        // Drain both pipes to EOF before waiting so the closing banner
        // lands strictly after the last streamed line.
        let stdout_read = stdout_task
            .await
            .unwrap_or_else(|e| Err(std::io::Error::other(e)));
        let stderr_read = stderr_task
            .await
            .unwrap_or_else(|e| Err(std::io::Error::other(e)));

        let status = child.wait().await.context("failed to wait for avrdude")?;

        if let Err(e) = stdout_read.and(stderr_read) {
            relay.push(format!("Error: failed reading avrdude output: {e}"));
            return Ok(FlashOutcome::LaunchError(format!("stream read error: {e}")));
        }

        if status.success() {
            Ok(FlashOutcome::Success)
        } else {
            // a child killed by a signal carries no exit code
            Ok(FlashOutcome::Failure(status.code().unwrap_or(-1)))
        }
    }
}

/// Spawns one flash attempt on a fresh background task. On completion
/// the terminal outcome is handed back to the interactive thread via
/// `tx` so the guard release and its control side effects run there.
pub fn spawn_flash(
    spec: CommandSpec,
    relay: Arc<OutputRelay>,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        let outcome = FlashRunner::run(&spec, &relay).await;
        let _ = tx.send(AppEvent::FlashFinished(outcome));
    });
}

async fn relay_lines<R>(stream: R, relay: Arc<OutputRelay>) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buffer = String::new();
    loop {
        match reader.read_line(&mut buffer).await {
            Ok(0) => return Ok(()),
            Ok(_) => {
                relay.push(buffer.trim_end_matches(['\r', '\n']).to_string());
                buffer.clear();
            }
            Err(e) => return Err(e),
        }
    }
}
