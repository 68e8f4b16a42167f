//! Client configuration.
//!
//! Holds the server location and the timing constants that drive the
//! console: reconnect delay, refresh cadence and notice lifetime.

use crate::error::{Error, Result};
use std::time::Duration;
use url::Url;

/// Server used when neither `--server` nor `MAILLOG_SERVER` is given.
pub const DEFAULT_SERVER_URL: &str = "http://localhost";

/// Delay before reconnecting the notification channel after it closes.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// How often the console checks whether the message list is stale.
pub const REFRESH_CHECK_INTERVAL: Duration = Duration::from_secs(5);

/// How often the message list is marked stale regardless of events.
pub const FORCED_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Lifetime of a transient notice.
pub const NOTICE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for a single HTTP request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Path of the notification channel relative to the server root.
const CHANNEL_PATH: &str = "ws";

/// Connection settings and timings for a console session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the mail log server.
    pub server: Url,
    /// Timeout for a single HTTP request.
    pub request_timeout: Duration,
    /// Delay between channel reconnect attempts.
    pub reconnect_delay: Duration,
    /// Interval of the stale-list check.
    pub refresh_check_interval: Duration,
    /// Interval of the unconditional refresh.
    pub forced_refresh_interval: Duration,
    /// Lifetime of transient notices.
    pub notice_timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration for the given server with default timings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL does not parse or is not
    /// `http`/`https`.
    pub fn new(server: &str) -> Result<Self> {
        let mut url = Url::parse(server.trim())?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::Config {
                    message: format!("unsupported server scheme: {other}"),
                });
            }
        }
        if url.cannot_be_a_base() {
            return Err(Error::Config {
                message: format!("server URL cannot be a base: {server}"),
            });
        }
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self {
            server: url,
            request_timeout: REQUEST_TIMEOUT,
            reconnect_delay: RECONNECT_DELAY,
            refresh_check_interval: REFRESH_CHECK_INTERVAL,
            forced_refresh_interval: FORCED_REFRESH_INTERVAL,
            notice_timeout: NOTICE_TIMEOUT,
        })
    }

    /// Builds a URL below the server root from path segments.
    ///
    /// Segments are percent-encoded, so a message UUID can never escape
    /// its path position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the server URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.server.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config {
                message: format!("server URL cannot be a base: {}", self.server),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of the notification channel (`ws://` or `wss://`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the scheme cannot be switched.
    pub fn channel_url(&self) -> Result<Url> {
        let mut url = self.endpoint(&[CHANNEL_PATH])?;
        let scheme = if self.server.scheme() == "https" {
            "wss"
        } else {
            "ws"
        };
        url.set_scheme(scheme).map_err(|()| Error::Config {
            message: format!("cannot derive channel URL from {}", self.server),
        })?;
        Ok(url)
    }

    /// Deep link to a message in the web console (`<server>#uuid=<id>`).
    #[must_use]
    pub fn message_link(&self, uuid: &str) -> String {
        let mut url = self.server.clone();
        url.set_fragment(Some(&crate::core::location::fragment_for(uuid)));
        url.to_string()
    }
}
