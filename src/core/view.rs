//! Source views of a message.
//!
//! Each message can be rendered as its plain text body, its HTML body, the
//! raw RFC 822 source or the mail server log lines that mention it. Which
//! of these are offered depends on the message and on the server config.

use super::message::MessageEntry;
use crate::error::CommandError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One rendering of a message served by `/api/message/{uuid}.{ext}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceView {
    /// Decoded plain text body.
    #[default]
    PlainText,
    /// Decoded HTML body.
    Html,
    /// Original message source.
    Source,
    /// Mail server log lines for the message.
    Log,
}

impl SourceView {
    /// All views in tab order.
    pub const ALL: [Self; 4] = [Self::PlainText, Self::Html, Self::Source, Self::Log];

    /// File extension appended to the message resource.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Html => "html",
            Self::Source => "eml",
            Self::Log => "log",
        }
    }

    /// Short tab label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Html => "html",
            Self::Source => "source",
            Self::Log => "log",
        }
    }

    /// Whether this view can be shown for `entry`.
    ///
    /// A message without a plain text body always offers the HTML view;
    /// the log view disappears when the server disables logs.
    #[must_use]
    pub const fn is_available(self, entry: &MessageEntry, logs_enabled: bool) -> bool {
        match self {
            Self::PlainText => entry.plain_text,
            Self::Html => entry.html || !entry.plain_text,
            Self::Source => true,
            Self::Log => logs_enabled,
        }
    }

    /// Picks the view to show when `entry` becomes selected.
    ///
    /// Keeps `self` when it is available, otherwise falls back to HTML for
    /// messages without plain text and to plain text for the rest.
    #[must_use]
    pub const fn resolve(self, entry: &MessageEntry, logs_enabled: bool) -> Self {
        if self.is_available(entry, logs_enabled) {
            self
        } else if entry.plain_text {
            Self::PlainText
        } else {
            Self::Html
        }
    }
}

impl fmt::Display for SourceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SourceView {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" | "plain" | "plaintext" => Ok(Self::PlainText),
            "html" => Ok(Self::Html),
            "source" | "eml" | "raw" => Ok(Self::Source),
            "log" | "logs" => Ok(Self::Log),
            other => Err(CommandError::InvalidArgument(format!(
                "unknown view '{other}' (expected text, html, source or log)"
            ))),
        }
    }
}
