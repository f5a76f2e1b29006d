//! Firmware file selection model

/// One entry in the firmware list. `display_name` is what the operator
/// sees; `file_name` is the on-disk name under the firmware directory.
/// Existence of the file is verified by the runner at execution time,
/// not earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareSelection {
    pub display_name: String,
    pub file_name: String,
}

impl FirmwareSelection {
    /// True when the display name is a shortened form of the file name.
    pub fn is_abbreviated(&self) -> bool {
        self.display_name != self.file_name
    }
}
