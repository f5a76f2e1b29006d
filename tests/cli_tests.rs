//! Unit tests for CLI argument parsing and startup context resolution.

use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use avrpush::cli::{AppContext, Cli, Commands};

#[test]
fn tui_mode_is_the_default() {
    let cli = Cli::parse_from(["avrpush"]);
    assert!(cli.command.is_none());
    assert!(cli.firmware_dir.is_none());
    assert_eq!(cli.verbose, 0);
    assert!(!cli.quiet);
}

#[test]
fn flash_subcommand_takes_port_and_firmware() {
    let cli = Cli::parse_from([
        "avrpush", "flash", "--port", "/dev/ttyUSB0", "--firmware", "ID01",
    ]);
    match cli.command {
        Some(Commands::Flash { port, firmware }) => {
            assert_eq!(port, "/dev/ttyUSB0");
            assert_eq!(firmware, "ID01");
        }
        _ => panic!("expected the flash subcommand"),
    }
}

#[test]
fn verbosity_flags_accumulate() {
    let cli = Cli::parse_from(["avrpush", "-vv", "ports"]);
    assert_eq!(cli.verbose, 2);
    assert!(matches!(cli.command, Some(Commands::Ports)));
}

#[test]
fn context_defaults_firmware_dir_and_config() {
    let cli = Cli::parse_from(["avrpush"]);
    let context = AppContext::from_cli(&cli).expect("context");
    assert_eq!(context.firmware_dir, PathBuf::from("firmware"));
    assert_eq!(context.flash_config.programmer, "serialupdi");
    assert_eq!(context.flash_config.part, "t1616");
    assert_eq!(context.flash_config.baud_rate, 57_600);
}

#[test]
fn context_loads_config_next_to_the_firmware_dir() {
    let dir = TempDir::new().expect("temp dir");
    let firmware_dir = dir.path().join("firmware");
    std::fs::create_dir(&firmware_dir).expect("mkdir");
    std::fs::write(dir.path().join("avrpush.toml"), "baud_rate = 115200\n").expect("write");

    let cli = Cli::parse_from([
        "avrpush",
        "--firmware-dir",
        firmware_dir.to_str().unwrap(),
    ]);
    let context = AppContext::from_cli(&cli).expect("context");
    assert_eq!(context.flash_config.baud_rate, 115_200);
    assert_eq!(context.flash_config.part, "t1616");
}

#[test]
fn explicit_avrdude_override_is_kept_verbatim() {
    let cli = Cli::parse_from(["avrpush", "--avrdude", "/opt/tools/avrdude"]);
    let context = AppContext::from_cli(&cli).expect("context");
    assert_eq!(context.avrdude, PathBuf::from("/opt/tools/avrdude"));
}

#[cfg(unix)]
mod one_shot_flash {
    use super::*;
    use avrpush::cli::commands::flash::execute_flash_command;
    use avrpush::config::FlashConfig;

    fn context(firmware_dir: &std::path::Path, avrdude: PathBuf) -> AppContext {
        AppContext {
            firmware_dir: firmware_dir.to_path_buf(),
            avrdude,
            flash_config: FlashConfig::default(),
        }
    }

    #[tokio::test]
    async fn missing_avrdude_fails_with_the_launch_reason() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("ID01_firm.hex"), b":00000001FF\n").expect("write");
        let missing = dir.path().join("avrdude");
        let context = context(dir.path(), missing.clone());

        let result = execute_flash_command(&context, "/dev/ttyUSB0", "ID01").await;
        let message = format!("{:#}", result.expect_err("should fail"));
        assert!(message.contains("flash could not run"));
        assert!(message.contains(missing.to_str().unwrap()));
    }

    #[tokio::test]
    async fn successful_run_resolves_display_names() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("ID01_firm.hex"), b":00000001FF\n").expect("write");
        let context = context(dir.path(), PathBuf::from("/bin/true"));

        // display name "ID01" resolves to ID01_firm.hex on disk
        execute_flash_command(&context, "/dev/ttyUSB0", "ID01")
            .await
            .expect("flash should succeed");
    }

    #[tokio::test]
    async fn nonzero_exit_surfaces_the_exit_code() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("ID01_firm.hex"), b":00000001FF\n").expect("write");
        let context = context(dir.path(), PathBuf::from("/bin/false"));

        let result = execute_flash_command(&context, "/dev/ttyUSB0", "ID01_firm.hex").await;
        let message = format!("{:#}", result.expect_err("should fail"));
        assert!(message.contains("exited with code 1"));
    }
}
