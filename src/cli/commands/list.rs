//! Port and firmware listing commands

use anyhow::Result;

use crate::cli::AppContext;
use crate::{firmware, ports};

pub fn execute_ports_command() -> Result<()> {
    let ports = ports::list_serial_ports()?;
    if ports.is_empty() {
        println!("No serial ports found.");
        return Ok(());
    }
    println!("Serial ports ({}):", ports.len());
    for port in ports {
        println!("  {port}");
    }
    Ok(())
}

pub fn execute_firmware_command(context: &AppContext) -> Result<()> {
    let files = firmware::list_firmware_files(&context.firmware_dir)?;
    if files.is_empty() {
        println!(
            "No firmware files found in {}.",
            context.firmware_dir.display()
        );
        return Ok(());
    }
    println!(
        "Firmware files in {} ({}):",
        context.firmware_dir.display(),
        files.len()
    );
    for file in files {
        if file.is_abbreviated() {
            println!("  {} ({})", file.display_name, file.file_name);
        } else {
            println!("  {}", file.file_name);
        }
    }
    Ok(())
}
