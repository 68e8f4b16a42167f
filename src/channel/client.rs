//! Reconnecting notification channel client.

use super::event::ChannelEvent;
use crate::error::ChannelError;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

/// What the channel reports to the console.
#[derive(Debug)]
pub enum ChannelUpdate {
    /// A connection attempt is starting.
    Connecting,
    /// The connection is open.
    Connected,
    /// The server pushed an event.
    Event(ChannelEvent),
    /// Connecting failed, the connection broke or a frame was malformed.
    Failed(ChannelError),
    /// The connection is gone; a reconnect follows after the delay.
    Closed,
}

/// Websocket client that reconnects after a fixed delay.
///
/// Runs until the receiving side of its update channel is dropped.
#[derive(Debug, Clone)]
pub struct ChannelClient {
    url: Url,
    reconnect_delay: Duration,
}

impl ChannelClient {
    /// Creates a client for `url` waiting `reconnect_delay` between sessions.
    #[must_use]
    pub const fn new(url: Url, reconnect_delay: Duration) -> Self {
        Self {
            url,
            reconnect_delay,
        }
    }

    /// Runs the client on a new task.
    pub fn spawn(self, updates: mpsc::Sender<ChannelUpdate>) -> JoinHandle<()> {
        tokio::spawn(self.run(updates))
    }

    /// Connects, forwards events and reconnects, forever.
    pub async fn run(self, updates: mpsc::Sender<ChannelUpdate>) {
        loop {
            if !self.session(&updates).await {
                debug!("channel receiver dropped, stopping");
                return;
            }
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// One connection lifetime. Returns `false` once nobody listens.
    async fn session(&self, updates: &mpsc::Sender<ChannelUpdate>) -> bool {
        if updates.send(ChannelUpdate::Connecting).await.is_err() {
            return false;
        }
        info!(url = %self.url, "connecting to notification channel");

        let mut stream = match connect_async(self.url.as_str()).await {
            Ok((stream, _)) => stream,
            Err(err) => {
                warn!(error = %err, "notification channel connect failed");
                let failed = ChannelUpdate::Failed(ChannelError::Connect(err.to_string()));
                return updates.send(failed).await.is_ok()
                    && updates.send(ChannelUpdate::Closed).await.is_ok();
            }
        };

        if updates.send(ChannelUpdate::Connected).await.is_err() {
            return false;
        }

        while let Some(frame) = stream.next().await {
            let update = match frame {
                Ok(Message::Text(text)) => match ChannelEvent::parse(&text) {
                    Ok(event) => ChannelUpdate::Event(event),
                    Err(err) => ChannelUpdate::Failed(err),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(err) => {
                    warn!(error = %err, "notification channel failed");
                    if updates.send(ChannelUpdate::Failed(err.into())).await.is_err() {
                        return false;
                    }
                    break;
                }
            };
            if updates.send(update).await.is_err() {
                return false;
            }
        }

        info!("notification channel closed");
        updates.send(ChannelUpdate::Closed).await.is_ok()
    }
}
