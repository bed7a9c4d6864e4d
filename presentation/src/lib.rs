//! Presentation layer for channel-relay
//!
//! This crate contains the CLI definition and the console formatter for
//! account status reports.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
