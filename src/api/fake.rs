//! In-memory [`MailLogApi`] for unit tests.

use super::{Classification, MailLogApi, MessageQuery, ServerConfig, SpamReport};
use crate::core::{MessageEntry, SourceView};
use crate::error::{ApiError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// Serves canned data and records learn requests.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    pub config: ServerConfig,
    pub messages: Vec<MessageEntry>,
    pub raw: Vec<u8>,
    pub report: SpamReport,
    pub learned: Mutex<Vec<(String, Classification)>>,
}

impl FakeApi {
    pub(crate) fn with_messages(messages: Vec<MessageEntry>) -> Self {
        Self {
            messages,
            raw: b"Subject: hi\r\n\r\nbody".to_vec(),
            ..Self::default()
        }
    }

    fn find(&self, uuid: &str) -> Result<&MessageEntry> {
        self.messages
            .iter()
            .find(|entry| entry.uuid == uuid)
            .ok_or_else(|| {
                ApiError::NotFound {
                    uuid: uuid.to_string(),
                }
                .into()
            })
    }
}

#[async_trait]
impl MailLogApi for FakeApi {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn config(&self) -> Result<ServerConfig> {
        Ok(self.config.clone())
    }

    async fn message_log(&self, query: &MessageQuery) -> Result<Vec<MessageEntry>> {
        let words: Vec<_> = query.text.split_whitespace().collect();
        Ok(self
            .messages
            .iter()
            .filter(|entry| {
                words.iter().all(|word| {
                    entry.subject.contains(word) || entry.from.contains(word) || entry.to.contains(word)
                })
            })
            .cloned()
            .collect())
    }

    async fn message(&self, uuid: &str) -> Result<MessageEntry> {
        self.find(uuid).cloned()
    }

    async fn message_source(&self, uuid: &str, view: SourceView) -> Result<String> {
        self.find(uuid)?;
        Ok(format!("{uuid}.{}", view.extension()))
    }

    async fn download(&self, uuid: &str) -> Result<Vec<u8>> {
        self.find(uuid)?;
        Ok(self.raw.clone())
    }

    async fn learn(&self, uuid: &str, classification: Classification) -> Result<SpamReport> {
        self.find(uuid)?;
        if let Ok(mut learned) = self.learned.lock() {
            learned.push((uuid.to_string(), classification));
        }
        Ok(self.report.clone())
    }
}
