//! Command Line Interface module
//!
//! Argument parsing, the scripting subcommands, and the Terminal User
//! Interface.

pub mod args;
pub mod commands;
pub mod tui;

pub use args::*;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::{self, FlashConfig};

/// Everything the commands and the TUI need that is fixed at startup.
pub struct AppContext {
    pub firmware_dir: PathBuf,
    pub avrdude: PathBuf,
    pub flash_config: FlashConfig,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let firmware_dir = cli
            .firmware_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("firmware"));

        // avrpush.toml sits next to the firmware directory
        let config_dir = firmware_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let flash_config = FlashConfig::load(config_dir)?;

        Ok(Self {
            firmware_dir,
            avrdude: config::resolve_avrdude(cli.avrdude.as_deref()),
            flash_config,
        })
    }
}

/// Main CLI application runner
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let tui_mode = cli.command.is_none();
    crate::utils::logging::init_logging(cli.verbose, cli.quiet, tui_mode)?;

    let context = AppContext::from_cli(&cli)?;

    match &cli.command {
        Some(command) => commands::execute_command(command.clone(), &context).await,
        None => tui::run_tui(context).await,
    }
}
