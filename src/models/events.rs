//! Application events for communication between the flash task and the
//! interactive loop

use crate::services::FlashOutcome;

#[derive(Debug)]
pub enum AppEvent {
    /// The background flash attempt reached its terminal outcome. The
    /// interactive loop releases the guard and re-enables controls when
    /// it sees this.
    FlashFinished(FlashOutcome),

    /// Fixed-period tick driving the relay drain.
    Tick,
}
