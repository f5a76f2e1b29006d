//! Serial port enumeration.
//!
//! The port list is an opaque external data source: names are shown and
//! passed to avrdude as-is, with no validation beyond what the platform
//! reports.

use anyhow::{Context, Result};

pub fn list_serial_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().context("failed to enumerate serial ports")?;
    let mut names: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();
    names.sort();
    Ok(names)
}
