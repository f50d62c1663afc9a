//! Live delivery ports.
//!
//! `ChannelTransport` is the primitive the transport layer provides: write
//! one message to one channel. `LivePush` is the user-addressed capability
//! the rest of the system depends on, so no handler ever touches sockets.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, UserId};
use crate::domain::notification::NotificationRecord;

/// Message pushed from the server to connected clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushMessage {
    /// A freshly persisted notification.
    Notification { notification: NotificationRecord },

    /// Refreshed unread counter for the recipient.
    UnreadCount { count: u64 },

    /// System-wide announcement sent to every channel.
    Announcement { title: String, message: String },
}

/// Errors that can occur while writing to a channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The transport has no channel with this id.
    #[error("Unknown channel: {0}")]
    UnknownChannel(ChannelId),

    /// The channel closed before the write completed.
    #[error("Channel closed: {0}")]
    ChannelClosed(ChannelId),

    /// Message could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Transport primitive: write a message to a single channel.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    async fn send(&self, channel_id: &ChannelId, message: &PushMessage)
        -> Result<(), TransportError>;
}

/// User-addressed, best-effort live delivery.
#[async_trait]
pub trait LivePush: Send + Sync {
    /// Push to every live channel of a user.
    ///
    /// Returns how many channels accepted the message. Zero is normal for
    /// offline users and is not an error.
    async fn send_to_user(&self, user_id: &UserId, message: PushMessage) -> usize;
}
