//! Firmware directory listing.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::models::FirmwareSelection;

/// Lists the files in the firmware directory, sorted by file name.
/// Files named `ID<digits>_firm.hex` (any case) display as `ID<digits>`;
/// everything else displays verbatim.
pub fn list_firmware_files(dir: &Path) -> Result<Vec<FirmwareSelection>> {
    let pattern = Regex::new(r"(?i)^(ID\d+)_firm\.hex$")?;

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read firmware directory {}", dir.display()))?;

    let mut file_names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    file_names.sort();

    Ok(file_names
        .into_iter()
        .map(|file_name| {
            let display_name = pattern
                .captures(&file_name)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| file_name.clone());
            FirmwareSelection {
                display_name,
                file_name,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").expect("create file");
    }

    #[test]
    fn matching_files_get_abbreviated_display_names() {
        let dir = TempDir::new().expect("temp dir");
        touch(dir.path(), "ID01_firm.hex");
        touch(dir.path(), "id42_FIRM.HEX");
        touch(dir.path(), "bootloader.hex");

        let files = list_firmware_files(dir.path()).expect("list");
        assert_eq!(files.len(), 3);

        let id01 = files.iter().find(|f| f.file_name == "ID01_firm.hex").unwrap();
        assert_eq!(id01.display_name, "ID01");
        assert!(id01.is_abbreviated());

        let id42 = files.iter().find(|f| f.file_name == "id42_FIRM.HEX").unwrap();
        assert_eq!(id42.display_name, "id42");

        let other = files.iter().find(|f| f.file_name == "bootloader.hex").unwrap();
        assert_eq!(other.display_name, "bootloader.hex");
        assert!(!other.is_abbreviated());
    }

    #[test]
    fn listing_is_sorted_and_skips_directories() {
        let dir = TempDir::new().expect("temp dir");
        touch(dir.path(), "b.hex");
        touch(dir.path(), "a.hex");
        std::fs::create_dir(dir.path().join("nested")).expect("mkdir");

        let files = list_firmware_files(dir.path()).expect("list");
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.hex", "b.hex"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("firmware");
        assert!(list_firmware_files(&missing).is_err());
    }
}
