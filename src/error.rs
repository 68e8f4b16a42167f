//! Error types for maillog-console operations.
//!
//! This module provides the error hierarchy using `thiserror` for the API
//! client, the notification channel, local I/O and CLI commands.

use crate::api::SpamReport;
use thiserror::Error;

/// Result type alias for console operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Backend API errors (HTTP requests and responses).
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Errors talking to the backend HTTP API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status.
    #[error("server returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The server answered with `"status": "error"`.
    #[error("{message}")]
    Server {
        /// Error text reported by the server.
        message: String,
    },

    /// The requested message (or one of its renderings) does not exist.
    #[error("message not found: {uuid}")]
    NotFound {
        /// Message UUID.
        uuid: String,
    },

    /// No upstream accepted a ham/spam report.
    #[error("{message}")]
    ReportRejected {
        /// Error text reported by the server.
        message: String,
        /// What each upstream answered.
        report: SpamReport,
    },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Errors on the push-notification channel.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Could not establish the connection.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The established connection failed.
    #[error("connection lost: {0}")]
    Transport(String),

    /// A frame that is not a well-formed channel event.
    #[error("received weird response: {payload}")]
    Malformed {
        /// The raw frame text.
        payload: String,
    },
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The server has switched a feature off.
    #[error("{0} is disabled on this server")]
    Disabled(String),

    /// User cancelled operation.
    #[error("operation cancelled by user")]
    Cancelled,
}

impl Error {
    /// The innermost reason, without the category prefix.
    ///
    /// Used for operator-facing notices such as
    /// `Unable to pull message: Messages was not found`.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Api(err) => err.to_string(),
            Self::Io(err) => err.to_string(),
            Self::Command(err) => err.to_string(),
            Self::Config { message } => message.clone(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status {
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Api(err.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Config {
            message: format!("invalid server URL: {err}"),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ChannelError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
