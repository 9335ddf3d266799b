//! Order notification channels
//!
//! No order is stored anywhere: the WhatsApp message to the shop owner and the
//! confirmation email to the customer are the order record. This module holds
//! the wire payload both channels share, the `NotificationChannel` seam the
//! checkout talks to, and the server side of both functions.

pub mod email;
pub mod payload;
pub mod remote;
pub mod whatsapp;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub use payload::{NotificationItem, OrderNotification, SizeLabel};
pub use remote::FunctionChannel;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    WhatsApp,
    Email,
}

impl ChannelKind {
    /// Path segment of the function that serves this channel.
    pub const fn function_name(self) -> &'static str {
        match self {
            Self::WhatsApp => "send-whatsapp-order",
            Self::Email => "send-order-email",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WhatsApp => write!(f, "whatsapp"),
            Self::Email => write!(f, "email"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The request could not even be put together (bad endpoint, unencodable body).
    #[error("could not build {channel} request: {reason}")]
    Request { channel: ChannelKind, reason: String },

    /// The request was built but never got an HTTP response.
    #[error("{channel} transport error: {reason}")]
    Transport { channel: ChannelKind, reason: String },

    /// The function answered with a non-success status.
    #[error("{channel} rejected with status {status}: {body}")]
    Rejected { channel: ChannelKind, status: u16, body: String },
}

impl NotifyError {
    pub fn channel(&self) -> ChannelKind {
        match self {
            Self::Request { channel, .. } | Self::Transport { channel, .. } | Self::Rejected { channel, .. } => *channel,
        }
    }
}

/// One outbound integration the checkout fans out to.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    async fn notify(&self, order: &OrderNotification) -> Result<(), NotifyError>;
}
