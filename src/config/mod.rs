//! Configuration management for avrpush

pub mod flash_config;

pub use flash_config::*;
