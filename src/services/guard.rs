//! Single-flight guard around the external flash process.
//!
//! At most one avrdude invocation may be in flight across the whole
//! program. The guard owns the only Idle/Running state instance; no
//! other code path flips it.

use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Idle,
    Running,
}

pub struct FlashGuard {
    state: Mutex<ExecutionState>,
}

impl FlashGuard {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ExecutionState::Idle),
        }
    }

    /// Atomically transitions Idle -> Running. Returns false without
    /// blocking or mutating anything when a flash is already in flight.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            ExecutionState::Idle => {
                *state = ExecutionState::Running;
                true
            }
            ExecutionState::Running => false,
        }
    }

    /// Transitions back to Idle. Safe to call when already Idle.
    pub fn release(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = ExecutionState::Idle;
    }

    pub fn is_running(&self) -> bool {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) == ExecutionState::Running
    }
}

impl Default for FlashGuard {
    fn default() -> Self {
        Self::new()
    }
}
