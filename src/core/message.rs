//! Message log entries.
//!
//! A [`MessageEntry`] is one processed email as the server reports it in
//! the message log: envelope addresses, subject, which bodies exist, spam
//! score and delivery status.

use super::format::{bytes_to_human, format_received};
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

/// One processed email record.
///
/// # Examples
///
/// ```
/// use maillog_console::core::MessageEntry;
///
/// let entry: MessageEntry = serde_json::from_str(r#"{
///     "uuid": "2f1c", "message_id": "<a@b>", "from": "a@example.com",
///     "to": "b@example.com", "subject": "Hi", "plain_text": true,
///     "html": false, "attachments": false, "spam_score": 0,
///     "source_ip": "10.0.0.1", "size": 2048,
///     "received": "2024-03-01T12:30:00Z", "status": "sent"
/// }"#).unwrap();
/// assert_eq!(entry.human_size(), "2 KB");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    /// Server-assigned identifier.
    pub uuid: String,

    /// `Message-ID` header value.
    #[serde(default)]
    pub message_id: String,

    /// Envelope sender.
    #[serde(default)]
    pub from: String,

    /// Envelope recipients.
    #[serde(default)]
    pub to: String,

    /// Subject line.
    #[serde(default)]
    pub subject: String,

    /// Whether a plain text body exists.
    #[serde(default)]
    pub plain_text: bool,

    /// Whether an HTML body exists.
    #[serde(default)]
    pub html: bool,

    /// Whether the message carries attachments.
    #[serde(default)]
    pub attachments: bool,

    /// Spam score assigned at intake.
    #[serde(default)]
    pub spam_score: i64,

    /// Address of the sending host.
    #[serde(default)]
    pub source_ip: String,

    /// Raw size in bytes.
    #[serde(default)]
    pub size: i64,

    /// When the message was received.
    pub received: DateTime<FixedOffset>,

    /// Delivery status from the mail log.
    #[serde(default)]
    pub status: String,
}

impl MessageEntry {
    /// Receive time in local time as `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn formatted_received(&self) -> String {
        format_received(&self.received, &Local)
    }

    /// Size rendered with a binary unit, e.g. `1.5 KB`.
    #[must_use]
    pub fn human_size(&self) -> String {
        bytes_to_human(u64::try_from(self.size).unwrap_or(0))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::entry;
    use super::*;

    #[test]
    fn test_deserialize_server_entry() {
        let json = r#"{
            "uuid": "7d0e", "message_id": "<x@y>", "from": "a@example.com",
            "to": "b@example.com", "subject": "Report", "plain_text": false,
            "html": true, "attachments": true, "spam_score": 7,
            "source_ip": "", "size": 5242880,
            "received": "2024-03-01T08:00:00-05:00", "status": "deferred"
        }"#;
        let entry: MessageEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.uuid, "7d0e");
        assert!(entry.html);
        assert!(!entry.plain_text);
        assert_eq!(entry.spam_score, 7);
        assert_eq!(entry.human_size(), "5 MB");
        assert_eq!(entry.received.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_missing_source_ip_defaults() {
        let json = r#"{"uuid": "1", "received": "2024-03-01T08:00:00Z"}"#;
        let entry: MessageEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.source_ip, "");
        assert_eq!(entry.size, 0);
        assert_eq!(entry.human_size(), "0 B");
    }

    #[test]
    fn test_negative_size_is_zero() {
        let mut message = entry("a", "s");
        message.size = -1;
        assert_eq!(message.human_size(), "0 B");
    }

    #[test]
    fn test_serialization_keeps_wire_names() {
        let json = serde_json::to_value(entry("abc", "Hello")).unwrap();
        assert_eq!(json["uuid"], "abc");
        assert_eq!(json["plain_text"], true);
        assert_eq!(json["received"], "2024-03-01T12:30:00Z");
    }
}
