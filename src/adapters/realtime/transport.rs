//! WebSocket-backed channel transport.
//!
//! Every open socket gets an unbounded outbox. The socket's writer task
//! drains it; everything else only ever enqueues.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tokio::sync::mpsc;

use crate::domain::foundation::ChannelId;
use crate::ports::{ChannelTransport, PushMessage, TransportError};

use super::messages::ServerMessage;

/// Outbox per open WebSocket, keyed by channel id.
#[derive(Default)]
pub struct WebSocketTransport {
    outboxes: RwLock<HashMap<ChannelId, mpsc::UnboundedSender<ServerMessage>>>,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an outbox for a channel and hand back its receiving end.
    pub fn open(&self, channel_id: &ChannelId) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.outboxes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel_id.clone(), tx);
        rx
    }

    pub fn close(&self, channel_id: &ChannelId) {
        self.outboxes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(channel_id);
    }

    /// Enqueue any server message, including protocol replies.
    pub fn enqueue(
        &self,
        channel_id: &ChannelId,
        message: ServerMessage,
    ) -> Result<(), TransportError> {
        let outboxes = self.outboxes.read().unwrap_or_else(PoisonError::into_inner);
        let outbox = outboxes
            .get(channel_id)
            .ok_or_else(|| TransportError::UnknownChannel(channel_id.clone()))?;
        outbox
            .send(message)
            .map_err(|_| TransportError::ChannelClosed(channel_id.clone()))
    }
}

#[async_trait]
impl ChannelTransport for WebSocketTransport {
    async fn send(&self, channel_id: &ChannelId, message: &PushMessage) -> Result<(), TransportError> {
        self.enqueue(channel_id, ServerMessage::from(message.clone()))
    }
}
