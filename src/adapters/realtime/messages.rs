//! WebSocket message protocol.
//!
//! - Server → Client: connection status, notifications, unread counters,
//!   announcements, pongs, errors
//! - Client → Server: authenticate, ping

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::notification::NotificationRecord;
use crate::ports::PushMessage;

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Channel opened; the client should authenticate next.
    Connected { channel_id: String, timestamp: String },

    /// Channel is now bound to a user.
    Authenticated { user_id: String },

    /// A freshly persisted notification.
    Notification { notification: NotificationRecord },

    /// Refreshed unread counter.
    UnreadCount { count: u64 },

    /// System-wide announcement.
    Announcement { title: String, message: String },

    /// Heartbeat response.
    Pong { timestamp: String },

    /// Error occurred while handling a client message.
    Error { code: String, message: String },
}

impl ServerMessage {
    pub fn connected(channel_id: impl Into<String>) -> Self {
        Self::Connected {
            channel_id: channel_id.into(),
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }

    pub fn pong() -> Self {
        Self::Pong {
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<PushMessage> for ServerMessage {
    fn from(message: PushMessage) -> Self {
        match message {
            PushMessage::Notification { notification } => Self::Notification { notification },
            PushMessage::UnreadCount { count } => Self::UnreadCount { count },
            PushMessage::Announcement { title, message } => Self::Announcement { title, message },
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Bind this channel to a user.
    Authenticate { user_id: String },

    /// Heartbeat request.
    Ping,
}
