//! One-shot flash command for scripting, without the TUI.
//!
//! Runs the same relay/guard/runner pipeline as the TUI and pumps the
//! relay to stdout on a fixed period.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::cli::AppContext;
use crate::firmware;
use crate::models::AppEvent;
use crate::services::{CommandSpec, FlashOutcome, OutputRelay, spawn_flash};

pub async fn execute_flash_command(context: &AppContext, port: &str, firmware: &str) -> Result<()> {
    let firmware_file = resolve_firmware_name(context, firmware);
    let firmware_path = context.firmware_dir.join(&firmware_file);
    let spec = CommandSpec::avrdude(
        &context.avrdude,
        port,
        &firmware_path,
        &context.flash_config,
    );

    println!("Flashing {firmware_file} through {port}");
    println!("Command: {}", spec.command_line());
    println!();

    // One process, one attempt: the single-flight guard lives in the
    // TUI, where a second request is possible. Here nothing else can
    // start a flash, so no guard is needed.
    let relay = Arc::new(OutputRelay::new());
    let (tx, mut rx) = mpsc::unbounded_channel();

    spawn_flash(spec, Arc::clone(&relay), tx);

    let outcome = loop {
        for line in relay.drain_all() {
            println!("{line}");
        }
        tokio::select! {
            Some(event) = rx.recv() => {
                match event {
                    AppEvent::FlashFinished(outcome) => break outcome,
                    AppEvent::Tick => {}
                }
            }
            _ = tokio::time::sleep(Duration::from_millis(100)) => {}
        }
    };
    for line in relay.drain_all() {
        println!("{line}");
    }

    match outcome {
        FlashOutcome::Success => Ok(()),
        FlashOutcome::Failure(code) => anyhow::bail!("avrdude exited with code {code}"),
        FlashOutcome::LaunchError(reason) => anyhow::bail!("flash could not run: {reason}"),
    }
}

/// Accepts either the display name shown in the TUI or the literal file
/// name. Unknown names pass through untouched so the runner can report
/// the concrete missing path.
fn resolve_firmware_name(context: &AppContext, requested: &str) -> String {
    match firmware::list_firmware_files(&context.firmware_dir) {
        Ok(files) => files
            .iter()
            .find(|f| f.display_name == requested || f.file_name == requested)
            .map(|f| f.file_name.clone())
            .unwrap_or_else(|| requested.to_string()),
        Err(_) => requested.to_string(),
    }
}
