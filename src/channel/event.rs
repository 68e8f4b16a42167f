//! Events pushed by the server over the notification channel.
//!
//! Every frame is a JSON object `{"type": <name>, "msg": <payload>}`.

use crate::core::MessageEntry;
use crate::error::ChannelError;
use serde::Deserialize;
use serde_json::Value;

/// A decoded channel frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Delivery statuses of some messages changed.
    MessageStatusesUpdated,

    /// A new message was received. The entry is `None` when the payload
    /// could not be decoded; the refresh still applies.
    ReceivedNewMessage(Option<Box<MessageEntry>>),

    /// The archive now holds this many messages.
    UpdateMessageCount(u64),

    /// Any other event type; only logged.
    Other {
        /// Value of `type`.
        kind: String,
        /// Value of `msg`.
        payload: Value,
    },
}

#[derive(Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    msg: Value,
}

impl ChannelEvent {
    /// Decodes one text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Malformed`] when the frame is not JSON, has no
    /// `type`, or carries a non-numeric message count.
    ///
    /// # Examples
    ///
    /// ```
    /// use maillog_console::channel::ChannelEvent;
    ///
    /// let event = ChannelEvent::parse(r#"{"type":"updateMessageCount","msg":42}"#).unwrap();
    /// assert_eq!(event, ChannelEvent::UpdateMessageCount(42));
    /// ```
    pub fn parse(text: &str) -> Result<Self, ChannelError> {
        let malformed = || ChannelError::Malformed {
            payload: text.to_string(),
        };
        let frame: Frame = serde_json::from_str(text).map_err(|_| malformed())?;

        let event = match frame.kind.as_str() {
            "messageStatusesUpdated" => Self::MessageStatusesUpdated,
            "receivedNewMessage" => Self::ReceivedNewMessage(
                serde_json::from_value(frame.msg).ok().map(Box::new),
            ),
            "updateMessageCount" => {
                Self::UpdateMessageCount(frame.msg.as_u64().ok_or_else(malformed)?)
            }
            _ => Self::Other {
                kind: frame.kind,
                payload: frame.msg,
            },
        };
        Ok(event)
    }

    /// Whether the message list is stale after this event.
    #[must_use]
    pub const fn requires_refresh(&self) -> bool {
        matches!(
            self,
            Self::MessageStatusesUpdated | Self::ReceivedNewMessage(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_statuses_updated() {
        let event = ChannelEvent::parse(r#"{"type":"messageStatusesUpdated","msg":true}"#).unwrap();
        assert_eq!(event, ChannelEvent::MessageStatusesUpdated);
        assert!(event.requires_refresh());
    }

    #[test]
    fn test_received_new_message_with_entry() {
        let text = r#"{"type":"receivedNewMessage","msg":{"uuid":"n1","subject":"Hello","received":"2024-03-01T12:00:00Z"}}"#;
        let event = ChannelEvent::parse(text).unwrap();
        assert!(matches!(
            &event,
            ChannelEvent::ReceivedNewMessage(Some(entry)) if entry.subject == "Hello"
        ));
        assert!(event.requires_refresh());
    }

    #[test]
    fn test_received_new_message_with_odd_payload() {
        let event = ChannelEvent::parse(r#"{"type":"receivedNewMessage","msg":"x"}"#).unwrap();
        assert_eq!(event, ChannelEvent::ReceivedNewMessage(None));
        assert!(event.requires_refresh());
    }

    #[test]
    fn test_message_count() {
        let event = ChannelEvent::parse(r#"{"type":"updateMessageCount","msg":1234567}"#).unwrap();
        assert_eq!(event, ChannelEvent::UpdateMessageCount(1_234_567));
        assert!(!event.requires_refresh());
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let event = ChannelEvent::parse(r#"{"type":"error","msg":{"status":"error"}}"#).unwrap();
        assert!(matches!(event, ChannelEvent::Other { ref kind, .. } if kind == "error"));
        assert!(!event.requires_refresh());
    }

    #[test_case("not json")]
    #[test_case("{}")]
    #[test_case(r#"{"msg":1}"#)]
    #[test_case(r#"{"type":"updateMessageCount","msg":"many"}"#)]
    #[test_case("null")]
    fn test_malformed(text: &str) {
        let err = ChannelEvent::parse(text).unwrap_err();
        assert!(matches!(err, ChannelError::Malformed { ref payload } if payload == text));
    }
}
