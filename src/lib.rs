//! avrpush - AVR Firmware Flasher
//!
//! avrpush drives avrdude to write Intel HEX firmware images onto AVR
//! targets over a serial UPDI link. The operator picks a serial port and
//! a firmware file, avrpush runs avrdude in the background and streams
//! its output live into the log, one flash at a time.

pub mod cli;
pub mod config;
pub mod firmware;
pub mod models;
pub mod ports;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use models::*;
pub use services::{CommandSpec, FlashGuard, FlashOutcome, FlashRunner, OutputRelay};

/// avrpush version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// avrpush application name
pub const APP_NAME: &str = "avrpush";
