//! Console front end for the drone telemetry simulator.
//!
//! - display: text rendering of telemetry and status events
//! - commands: interactive command parsing
//! - observer: console observer and telemetry renderer

pub mod commands;
pub mod display;
pub mod observer;

pub use commands::{Command, ParseCommandError};
pub use observer::{ConsoleObserver, OutputFormat, Renderer};
