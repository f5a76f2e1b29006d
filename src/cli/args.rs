//! Command line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "avrpush")]
#[command(about = "AVR firmware flasher driving avrdude with a live output log")]
pub struct Cli {
    /// Directory containing firmware .hex files (defaults to ./firmware)
    #[arg(long, value_name = "DIR")]
    pub firmware_dir: Option<PathBuf>,

    /// Path to the avrdude executable (defaults to avrdude on PATH)
    #[arg(long, value_name = "PATH")]
    pub avrdude: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// List available serial ports
    Ports,
    /// List firmware files in the firmware directory
    Firmware,
    /// Flash a firmware file without starting the TUI
    Flash {
        /// Serial port to program through (e.g. /dev/ttyUSB0, COM3)
        #[arg(short, long)]
        port: String,
        /// Firmware file name (or its display name) from the firmware directory
        #[arg(short, long)]
        firmware: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
