//! HTTP implementation of [`MailLogApi`] on reqwest.

use super::types::{
    MessageBody, MessageLogBody, check_status, decode_envelope, decode_report,
};
use super::{Classification, MailLogApi, MessageQuery, ServerConfig, SpamReport};
use crate::config::ClientConfig;
use crate::core::{MessageEntry, SourceView};
use crate::error::{ApiError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("maillog-console/", env!("CARGO_PKG_VERSION"));

/// [`MailLogApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpApi {
    /// Creates a client for the server in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, config })
    }

    fn message_url(&self, uuid: &str, suffix: Option<&str>) -> Result<Url> {
        match suffix {
            Some(ext) => self
                .config
                .endpoint(&["api", "message", &format!("{uuid}.{ext}")]),
            None => self.config.endpoint(&["api", "message", uuid]),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response, None)?;
        let bytes = response.bytes().await?;
        Ok(decode_envelope(&bytes)?)
    }

    /// Fetches a message rendering, failing on error envelopes.
    async fn get_rendering(&self, uuid: &str, ext: &str) -> Result<Vec<u8>> {
        let url = self.message_url(uuid, Some(ext))?;
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response, Some(uuid))?;
        let json = is_json(&response);
        let bytes = response.bytes().await?;

        if json {
            let value: Value = serde_json::from_slice(&bytes).map_err(ApiError::from)?;
            check_status(&value)?;
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl MailLogApi for HttpApi {
    async fn ping(&self) -> Result<()> {
        let url = self.config.endpoint(&["api", "ping"])?;
        let _: Value = self.get_json(url).await?;
        Ok(())
    }

    async fn config(&self) -> Result<ServerConfig> {
        let url = self.config.endpoint(&["api", "config"])?;
        self.get_json(url).await
    }

    async fn message_log(&self, query: &MessageQuery) -> Result<Vec<MessageEntry>> {
        let mut url = self.config.endpoint(&["api", "message_log"])?;
        {
            let mut pairs = url.query_pairs_mut();
            if !query.text.is_empty() {
                pairs.append_pair("q", &query.text);
            }
            if let Some(page) = query.page {
                pairs.append_pair("p", &page.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        let body: MessageLogBody = self.get_json(url).await?;
        Ok(body.messages.unwrap_or_default())
    }

    async fn message(&self, uuid: &str) -> Result<MessageEntry> {
        let url = self.message_url(uuid, None)?;
        let body: MessageBody = self.get_json(url).await?;
        Ok(body.message)
    }

    async fn message_source(&self, uuid: &str, view: SourceView) -> Result<String> {
        let bytes = self.get_rendering(uuid, view.extension()).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn download(&self, uuid: &str) -> Result<Vec<u8>> {
        self.get_rendering(uuid, SourceView::Source.extension())
            .await
    }

    async fn learn(&self, uuid: &str, classification: Classification) -> Result<SpamReport> {
        let url = self
            .config
            .endpoint(&["api", "message", uuid, classification.endpoint()])?;
        debug!(%url, "PUT");
        let response = self.client.put(url).send().await?;
        let response = ensure_success(response, None)?;
        let bytes = response.bytes().await?;
        Ok(decode_report(&bytes)?)
    }
}

/// Maps non-success statuses to errors; 404 on a message becomes
/// [`ApiError::NotFound`].
fn ensure_success(response: Response, uuid: Option<&str>) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match uuid {
        Some(uuid) if status == StatusCode::NOT_FOUND => Err(ApiError::NotFound {
            uuid: uuid.to_string(),
        }
        .into()),
        _ => Err(ApiError::Status {
            status: status.as_u16(),
        }
        .into()),
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpApi {
        HttpApi::new(ClientConfig::new("http://example.com/archive").unwrap()).unwrap()
    }

    #[test]
    fn test_message_urls() {
        let api = api();
        assert_eq!(
            api.message_url("abc", None).unwrap().as_str(),
            "http://example.com/archive/api/message/abc"
        );
        assert_eq!(
            api.message_url("abc", Some("eml")).unwrap().as_str(),
            "http://example.com/archive/api/message/abc.eml"
        );
    }
}
