//! Logging initialization for avrpush

use std::io::Write;

use anyhow::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Initializes logging. TUI mode logs to a file so log output never
/// corrupts the alternate screen; CLI mode logs to stderr.
pub fn init_logging(verbose: u8, quiet: bool, tui_mode: bool) -> Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    if tui_mode {
        init_file_logger(level)?;
    } else {
        Builder::from_default_env()
            .target(Target::Stderr)
            .filter_level(level)
            .format_timestamp_secs()
            .format_module_path(false)
            .init();
    }

    log_panics::init();

    log::debug!("avrpush logging initialized with level: {:?}", level);
    Ok(())
}

fn init_file_logger(level: LevelFilter) -> Result<()> {
    use std::fs::OpenOptions;

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("avrpush")
        .join("logs");

    std::fs::create_dir_all(&log_dir)?;

    let log_file = log_dir.join("avrpush.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    Builder::from_default_env()
        .target(Target::Pipe(Box::new(file)))
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .init();

    Ok(())
}
