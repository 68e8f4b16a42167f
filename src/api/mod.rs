//! Client side of the mail log server API.
//!
//! [`MailLogApi`] is the seam between the console and the network: the
//! console runtime and the CLI only talk to the trait, [`HttpApi`] is the
//! reqwest implementation.

#[cfg(test)]
pub(crate) mod fake;
mod http;
pub mod types;

pub use http::HttpApi;
pub use types::{Classification, ReportAttempt, ServerConfig, SpamReport};

use crate::core::{MessageEntry, SourceView};
use crate::error::{IoError, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// Filter and page for a message log request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQuery {
    /// Space separated search words; every word must match some field.
    pub text: String,
    /// 1-based page; `None` lets the server pick the first page.
    pub page: Option<u32>,
}

impl MessageQuery {
    /// Query for the given search text on the first page.
    #[must_use]
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page: None,
        }
    }
}

/// Operations offered by the mail log server.
///
/// Implementations must be `Send + Sync` so requests can run on spawned
/// tasks while the console keeps handling input.
#[async_trait]
pub trait MailLogApi: Send + Sync {
    /// Checks that the server answers.
    async fn ping(&self) -> Result<()>;

    /// Fetches the console configuration.
    async fn config(&self) -> Result<ServerConfig>;

    /// Fetches the newest messages matching `query`.
    async fn message_log(&self, query: &MessageQuery) -> Result<Vec<MessageEntry>>;

    /// Fetches one message entry.
    async fn message(&self, uuid: &str) -> Result<MessageEntry>;

    /// Fetches one rendering of a message as text.
    async fn message_source(&self, uuid: &str, view: SourceView) -> Result<String>;

    /// Fetches the raw RFC 822 source.
    async fn download(&self, uuid: &str) -> Result<Vec<u8>>;

    /// Reports a message to the spam filter as ham or spam.
    async fn learn(&self, uuid: &str, classification: Classification) -> Result<SpamReport>;
}

/// Downloads the raw source of `uuid` into `path`.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns an error if the download fails or the file cannot be written.
pub async fn save_message(api: &dyn MailLogApi, uuid: &str, path: &Path) -> Result<usize> {
    let bytes = api.download(uuid).await?;
    tokio::fs::write(path, &bytes)
        .await
        .map_err(|err| IoError::WriteFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
    info!(uuid, path = %path.display(), bytes = bytes.len(), "saved message source");
    Ok(bytes.len())
}
