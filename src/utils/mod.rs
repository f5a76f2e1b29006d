//! Utility functions and helpers used throughout avrpush

pub mod logging;
