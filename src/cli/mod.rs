//! CLI layer for maillog-console.
//!
//! Provides the command-line interface using clap, with commands for
//! querying the message log, inspecting and classifying messages, and
//! opening the interactive console.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
