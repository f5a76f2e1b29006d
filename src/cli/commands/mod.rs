//! CLI command implementations

pub mod flash;
pub mod list;

use anyhow::Result;

use crate::cli::AppContext;
use crate::cli::args::Commands;

pub async fn execute_command(command: Commands, context: &AppContext) -> Result<()> {
    match command {
        Commands::Ports => list::execute_ports_command(),
        Commands::Firmware => list::execute_firmware_command(context),
        Commands::Flash { port, firmware } => {
            flash::execute_flash_command(context, &port, &firmware).await
        }
    }
}
