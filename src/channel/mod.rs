//! Push-notification channel.
//!
//! The server announces new messages, status changes and the message count
//! over a websocket at `/ws`. [`ChannelEvent`] decodes the frames and
//! [`ChannelClient`] keeps the connection up, reconnecting after a fixed
//! delay whenever it closes.

mod client;
mod event;

pub use client::{ChannelClient, ChannelUpdate};
pub use event::ChannelEvent;
