//! # maillog-console
//!
//! Operator console for a mail server's message log.
//!
//! maillog-console talks to a mail log server over its HTTP API and its
//! notification websocket. It lists and searches processed messages,
//! shows their plain text, HTML, raw source and server log, downloads the
//! raw `.eml` and reports messages to the spam filter as ham or spam.
//!
//! ## Features
//!
//! - **Live list**: websocket events mark the list stale; a single-flight
//!   loader refreshes it without overlapping requests
//! - **Source views**: per-message view resolution that follows the
//!   server configuration
//! - **Deep links**: `#uuid=<id>` links accepted wherever a message is named
//! - **Scriptable CLI**: every operation also available as a subcommand
//!   with text or JSON output

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod api;
pub mod channel;
pub mod cli;
pub mod config;
pub mod console;
pub mod core;
pub mod error;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{MessageEntry, SourceView, bytes_to_human, resolve_message_ref};

// Re-export API client types
pub use api::{Classification, HttpApi, MailLogApi, MessageQuery, ServerConfig, SpamReport};

// Re-export channel types
pub use channel::{ChannelClient, ChannelEvent, ChannelUpdate};

// Re-export configuration
pub use config::ClientConfig;

// Re-export console types
pub use console::{Console, ConsoleOptions, LoadGuard};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
