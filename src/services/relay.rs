//! Thread-safe FIFO relay carrying avrdude output lines from the flash
//! task to the log pane.
//!
//! The flash task pushes lines as they arrive on the child's pipes; the
//! TUI drains the relay on its tick. One relay instance lives for the
//! whole program and is reused across flash attempts.

use std::sync::Mutex;

use tokio::sync::mpsc;

pub struct OutputRelay {
    tx: mpsc::UnboundedSender<String>,
    rx: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl OutputRelay {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Queues one output line. Never blocks; the channel is unbounded
    /// because avrdude's output volume is small in practice.
    pub fn push(&self, line: impl Into<String>) {
        // send only fails if the receiver half is gone, which cannot
        // happen while the relay owns it
        let _ = self.tx.send(line.into());
    }

    /// Returns every line queued so far, in push order. Never blocks;
    /// an empty relay yields an empty vec.
    pub fn drain_all(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Ok(mut rx) = self.rx.lock() {
            while let Ok(line) = rx.try_recv() {
                lines.push(line);
            }
        }
        lines
    }
}

impl Default for OutputRelay {
    fn default() -> Self {
        Self::new()
    }
}
