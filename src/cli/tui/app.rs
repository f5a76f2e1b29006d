//! TUI application state
//!
//! The interactive thread owns every field here. Background flash tasks
//! only ever touch the shared relay and guard; their terminal outcome
//! comes back as an [`AppEvent`] so state changes stay on this side.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use crate::cli::AppContext;
use crate::config::FlashConfig;
use crate::firmware::list_firmware_files;
use crate::models::{AppEvent, FirmwareSelection};
use crate::ports::list_serial_ports;
use crate::services::{CommandSpec, FlashGuard, FlashOutcome, OutputRelay, spawn_flash};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    PortList,
    FirmwareList,
    LogPane,
}

/// Main application state for the TUI.
pub struct App {
    pub ports: Vec<String>,
    pub selected_port: usize,
    pub port_list_state: ListState,
    pub firmwares: Vec<FirmwareSelection>,
    pub selected_firmware: usize,
    pub firmware_list_state: ListState,
    pub log_lines: Vec<String>,
    pub log_scroll_offset: usize,
    pub log_auto_scroll: bool,
    pub focused_pane: FocusedPane,
    /// False while a flash is in progress; gates refresh and list input.
    pub controls_enabled: bool,
    pub last_outcome: Option<FlashOutcome>,
    pub firmware_dir: PathBuf,
    pub avrdude: PathBuf,
    pub flash_config: FlashConfig,
    pub guard: Arc<FlashGuard>,
    pub relay: Arc<OutputRelay>,
}

impl App {
    pub fn new(context: AppContext) -> Self {
        let mut app = Self {
            ports: Vec::new(),
            selected_port: 0,
            port_list_state: ListState::default(),
            firmwares: Vec::new(),
            selected_firmware: 0,
            firmware_list_state: ListState::default(),
            log_lines: Vec::new(),
            log_scroll_offset: 0,
            log_auto_scroll: true,
            focused_pane: FocusedPane::PortList,
            controls_enabled: true,
            last_outcome: None,
            firmware_dir: context.firmware_dir,
            avrdude: context.avrdude,
            flash_config: context.flash_config,
            guard: Arc::new(FlashGuard::new()),
            relay: Arc::new(OutputRelay::new()),
        };
        app.refresh_ports();
        app.refresh_firmware_files();
        app
    }

    pub fn refresh_ports(&mut self) {
        match list_serial_ports() {
            Ok(ports) => {
                if ports.is_empty() {
                    self.add_log_line("No serial ports found.");
                } else {
                    self.add_log_line(format!("Detected serial ports: {}", ports.join(", ")));
                }
                self.ports = ports;
            }
            Err(e) => {
                self.add_log_line(format!("Error: {e:#}"));
                self.ports.clear();
            }
        }
        self.selected_port = self.selected_port.min(self.ports.len().saturating_sub(1));
        self.port_list_state.select(if self.ports.is_empty() {
            None
        } else {
            Some(self.selected_port)
        });
    }

    pub fn refresh_firmware_files(&mut self) {
        match list_firmware_files(&self.firmware_dir) {
            Ok(files) => {
                self.add_log_line(format!(
                    "{} firmware file(s) in {}",
                    files.len(),
                    self.firmware_dir.display()
                ));
                self.firmwares = files;
            }
            Err(_) => {
                self.add_log_line(format!(
                    "Warning: firmware directory {} not found. Create it and drop .hex files inside.",
                    self.firmware_dir.display()
                ));
                self.firmwares.clear();
            }
        }
        self.selected_firmware = self
            .selected_firmware
            .min(self.firmwares.len().saturating_sub(1));
        self.firmware_list_state.select(if self.firmwares.is_empty() {
            None
        } else {
            Some(self.selected_firmware)
        });
    }

    pub fn toggle_focused_pane(&mut self) {
        self.focused_pane = match self.focused_pane {
            FocusedPane::PortList => FocusedPane::FirmwareList,
            FocusedPane::FirmwareList => FocusedPane::LogPane,
            FocusedPane::LogPane => FocusedPane::PortList,
        };
    }

    pub fn next_item(&mut self) {
        match self.focused_pane {
            FocusedPane::PortList => {
                if !self.ports.is_empty() {
                    self.selected_port = (self.selected_port + 1) % self.ports.len();
                    self.port_list_state.select(Some(self.selected_port));
                }
            }
            FocusedPane::FirmwareList => {
                if !self.firmwares.is_empty() {
                    self.selected_firmware = (self.selected_firmware + 1) % self.firmwares.len();
                    self.firmware_list_state.select(Some(self.selected_firmware));
                }
            }
            FocusedPane::LogPane => self.scroll_log_down(1),
        }
    }

    pub fn previous_item(&mut self) {
        match self.focused_pane {
            FocusedPane::PortList => {
                if !self.ports.is_empty() {
                    self.selected_port = self
                        .selected_port
                        .checked_sub(1)
                        .unwrap_or(self.ports.len() - 1);
                    self.port_list_state.select(Some(self.selected_port));
                }
            }
            FocusedPane::FirmwareList => {
                if !self.firmwares.is_empty() {
                    self.selected_firmware = self
                        .selected_firmware
                        .checked_sub(1)
                        .unwrap_or(self.firmwares.len() - 1);
                    self.firmware_list_state.select(Some(self.selected_firmware));
                }
            }
            FocusedPane::LogPane => self.scroll_log_up(1),
        }
    }

    pub fn scroll_log_up(&mut self, lines: usize) {
        self.log_auto_scroll = false;
        self.log_scroll_offset = self.log_scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_log_down(&mut self, lines: usize) {
        // clamped to the real maximum at render time
        self.log_scroll_offset = self.log_scroll_offset.saturating_add(lines);
    }

    pub fn scroll_log_to_top(&mut self) {
        self.log_auto_scroll = false;
        self.log_scroll_offset = 0;
    }

    pub fn scroll_log_to_bottom(&mut self) {
        self.log_auto_scroll = true;
    }

    pub fn add_log_line(&mut self, line: impl Into<String>) {
        self.log_lines.push(line.into());
    }

    pub fn clear_log(&mut self) {
        self.log_lines.clear();
        self.log_scroll_offset = 0;
        self.log_auto_scroll = true;
    }

    /// Moves everything the background tasks produced since the last
    /// tick into the visible log.
    pub fn drain_relay(&mut self) {
        self.log_lines.extend(self.relay.drain_all());
    }

    /// Starts one flash attempt for the current selections. Exactly one
    /// attempt can be in flight; a second request is refused with a
    /// notice instead of queueing.
    pub fn start_flash(&mut self, tx: mpsc::UnboundedSender<AppEvent>) {
        let Some(port) = self.ports.get(self.selected_port).cloned() else {
            self.add_log_line("Error: select a serial port first.");
            return;
        };
        let Some(selection) = self.firmwares.get(self.selected_firmware).cloned() else {
            self.add_log_line("Error: select a firmware file first.");
            return;
        };

        if !self.guard.try_acquire() {
            self.add_log_line("⚠️  avrdude is already running. Wait for the current flash to finish.");
            return;
        }
        self.controls_enabled = false;
        self.last_outcome = None;

        self.clear_log();
        self.add_log_line(format!(
            "=== AVR flash started {} ===",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        self.add_log_line(format!("Port: {port}"));
        if selection.is_abbreviated() {
            self.add_log_line(format!(
                "Firmware: {} ({})",
                selection.display_name, selection.file_name
            ));
        } else {
            self.add_log_line(format!("Firmware: {}", selection.file_name));
        }

        let firmware_path = self.firmware_dir.join(&selection.file_name);
        let spec = CommandSpec::avrdude(&self.avrdude, &port, &firmware_path, &self.flash_config);
        self.add_log_line(format!("Command: {}", spec.command_line()));
        self.add_log_line("=".repeat(40));

        log::info!("flashing {} via {}", selection.file_name, port);
        spawn_flash(spec, Arc::clone(&self.relay), tx);
    }

    /// Runs on the interactive thread when the background task reports
    /// its terminal outcome. Releases the guard and re-enables controls.
    pub fn finish_flash(&mut self, outcome: FlashOutcome) {
        self.drain_relay();
        self.guard.release();
        self.controls_enabled = true;
        log::info!("flash finished: {outcome:?}");
        self.last_outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_app(dir: &TempDir) -> App {
        let mut app = App::new(AppContext {
            firmware_dir: dir.path().to_path_buf(),
            avrdude: PathBuf::from("/bin/true"),
            flash_config: FlashConfig::default(),
        });
        app.ports = vec!["/dev/ttyUSB0".to_string()];
        app.selected_port = 0;
        app
    }

    #[tokio::test]
    async fn second_flash_request_is_refused_while_one_runs() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("ID01_firm.hex"), b":00000001FF\n").expect("write");
        let mut app = test_app(&dir);
        app.refresh_firmware_files();

        let (tx, mut rx) = mpsc::unbounded_channel();
        app.start_flash(tx.clone());
        assert!(app.guard.is_running());
        assert!(!app.controls_enabled);

        app.start_flash(tx);
        assert!(
            app.log_lines
                .iter()
                .any(|l| l.contains("already running")),
            "refusal notice missing from {:?}",
            app.log_lines
        );

        let event = rx.recv().await.expect("flash outcome");
        let AppEvent::FlashFinished(outcome) = event else {
            panic!("unexpected event");
        };
        app.finish_flash(outcome);
        assert!(!app.guard.is_running());
        assert!(app.controls_enabled);
    }

    #[tokio::test]
    async fn flash_without_selection_does_not_take_the_guard() {
        let dir = TempDir::new().expect("temp dir");
        let mut app = test_app(&dir);
        app.firmwares.clear();

        let (tx, _rx) = mpsc::unbounded_channel();
        app.start_flash(tx);
        assert!(!app.guard.is_running());
        assert!(app.controls_enabled);
    }
}
