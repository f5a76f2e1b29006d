//! Core flash execution services: the output relay, the single-flight
//! guard, and the avrdude process runner.

pub mod guard;
pub mod relay;
pub mod runner;

pub use guard::*;
pub use relay::*;
pub use runner::*;
