//! Wire types of the backend API.
//!
//! Every JSON response carries an optional `status`/`error` pair next to
//! its payload. A `status` of `"error"` means the payload is meaningless
//! and the `error` text explains why.

use crate::core::MessageEntry;
use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Value of `status` on failed requests.
pub const STATUS_ERROR: &str = "error";

/// Console configuration published by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Brand shown in the header; empty keeps the default.
    #[serde(default)]
    pub custom_brand: String,

    /// Hide ham/spam reporting.
    #[serde(default)]
    pub disable_spam_reporting: bool,

    /// Hide log views and the status column.
    #[serde(default)]
    pub disable_logs: bool,

    /// Total number of messages in the archive.
    #[serde(default)]
    pub message_count: u64,
}

/// Body of `/api/message_log`.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageLogBody {
    /// `null` when nothing matched.
    #[serde(default)]
    pub messages: Option<Vec<MessageEntry>>,
}

/// Body of `/api/message/{uuid}`.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageBody {
    pub message: MessageEntry,
}

/// Classification reported back to the spam filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Legitimate mail.
    Ham,
    /// Unwanted mail.
    Spam,
}

impl Classification {
    /// Last path segment of the learn endpoint.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Ham => "learn_ham",
            Self::Spam => "learn_spam",
        }
    }

    /// Lowercase name used in prompts and notices.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ham => "ham",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a learn request: one attempt per configured upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamReport {
    /// Attempts in the order the server made them.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub requests: Vec<ReportAttempt>,
}

/// One upstream submission made by the server.
///
/// The server reports every field as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAttempt {
    /// Upstream URL.
    #[serde(default)]
    pub url: String,

    /// `"true"` or `"false"`.
    #[serde(default)]
    pub success: String,

    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Upstream response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl ReportAttempt {
    /// Whether the upstream accepted the report.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.success == "true"
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes a JSON response, turning `"status": "error"` into an error.
pub(crate) fn decode_envelope<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(bytes)?;
    check_status(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// Decodes a learn response.
///
/// When no upstream accepted the report the server answers with an error
/// envelope that still lists every attempt; those are kept in
/// [`ApiError::ReportRejected`].
pub(crate) fn decode_report(bytes: &[u8]) -> Result<SpamReport, ApiError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Some(message) = error_message(&value) else {
        return Ok(serde_json::from_value(value)?);
    };
    match serde_json::from_value::<SpamReport>(value) {
        Ok(report) if !report.requests.is_empty() => {
            Err(ApiError::ReportRejected { message, report })
        }
        _ => Err(ApiError::Server { message }),
    }
}

/// Fails when a decoded JSON value is an error envelope.
pub(crate) fn check_status(value: &Value) -> Result<(), ApiError> {
    match error_message(value) {
        Some(message) => Err(ApiError::Server { message }),
        None => Ok(()),
    }
}

fn error_message(value: &Value) -> Option<String> {
    (value.get("status").and_then(Value::as_str) == Some(STATUS_ERROR)).then(|| {
        value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string()
    })
}
