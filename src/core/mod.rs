//! Core domain models for maillog-console.
//!
//! Message log entries, the source views a message can be rendered in,
//! message references and display helpers. These are pure models with no
//! I/O dependencies.

pub mod format;
pub mod location;
pub mod message;
pub mod view;

pub use format::{bytes_to_human, format_received, truncate};
pub use location::resolve_message_ref;
pub use message::MessageEntry;
pub use view::SourceView;
