//! Data models and types used throughout avrpush

pub mod events;
pub mod firmware;

pub use events::*;
pub use firmware::*;
