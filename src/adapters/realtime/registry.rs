//! Connection registry for live, multi-device delivery.
//!
//! Each channel moves through `Connected` → `Authenticated` → removed.
//! A user may own any number of channels at once.
//!
//! ```text
//! channels                         by_user
//! ├── ch-a  (user: u-1)            ├── u-1 → {ch-a, ch-b}
//! ├── ch-b  (user: u-1)            └── u-2 → {ch-c}
//! ├── ch-c  (user: u-2)
//! └── ch-d  (unauthenticated)
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::foundation::{ChannelId, Timestamp, UserId};
use crate::ports::{ChannelTransport, LivePush, PushMessage};

#[derive(Debug, Clone)]
struct ChannelEntry {
    user_id: Option<UserId>,
    joined_at: Timestamp,
}

#[derive(Debug, Default)]
struct RegistryState {
    channels: HashMap<ChannelId, ChannelEntry>,
    by_user: HashMap<UserId, HashSet<ChannelId>>,
}

impl RegistryState {
    fn unbind(&mut self, channel_id: &ChannelId, user_id: &UserId) {
        if let Some(owned) = self.by_user.get_mut(user_id) {
            owned.remove(channel_id);
            if owned.is_empty() {
                self.by_user.remove(user_id);
            }
        }
    }
}

/// Tracks live channels per user and pushes messages through a transport.
///
/// # Thread Safety
///
/// Both maps sit behind one lock, so connect, bind and remove are atomic
/// with respect to each other. The lock is never held across a transport
/// write: sends work on a snapshot of channel ids.
pub struct ConnectionRegistry {
    state: RwLock<RegistryState>,
    transport: Arc<dyn ChannelTransport>,
}

impl ConnectionRegistry {
    pub fn new(transport: Arc<dyn ChannelTransport>) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            transport,
        }
    }

    /// Register a freshly opened, unauthenticated channel.
    pub fn on_connect(&self, channel_id: ChannelId) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.channels.insert(
            channel_id.clone(),
            ChannelEntry {
                user_id: None,
                joined_at: Timestamp::now(),
            },
        );
        tracing::debug!(channel_id = %channel_id, "Channel connected");
    }

    /// Bind a channel to a user.
    ///
    /// Repeating the call for the same user is harmless. Binding to a
    /// different user moves the channel. Returns `false` without changing
    /// anything when the user id is empty or the channel is unknown.
    pub fn authenticate(&self, channel_id: &ChannelId, user_id: &str) -> bool {
        let Ok(user_id) = UserId::new(user_id.trim()) else {
            tracing::debug!(channel_id = %channel_id, "Ignoring authenticate with empty user id");
            return false;
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = state.channels.get_mut(channel_id) else {
            tracing::debug!(channel_id = %channel_id, "Ignoring authenticate for unknown channel");
            return false;
        };

        let previous = entry.user_id.replace(user_id.clone());
        if let Some(previous) = previous.filter(|p| p != &user_id) {
            state.unbind(channel_id, &previous);
        }
        state
            .by_user
            .entry(user_id.clone())
            .or_default()
            .insert(channel_id.clone());

        tracing::debug!(channel_id = %channel_id, user_id = %user_id, "Channel authenticated");
        true
    }

    /// Remove a channel in whatever state it is. Returns whether it existed.
    pub fn on_disconnect(&self, channel_id: &ChannelId) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = state.channels.remove(channel_id) else {
            return false;
        };
        if let Some(user_id) = &entry.user_id {
            state.unbind(channel_id, user_id);
        }

        tracing::debug!(
            channel_id = %channel_id,
            user_id = entry.user_id.as_ref().map(|u| u.as_str()),
            connected_secs = Timestamp::now()
                .as_unix_secs()
                .saturating_sub(entry.joined_at.as_unix_secs()),
            "Channel disconnected"
        );
        true
    }

    /// The transport reported a broken channel; drop it.
    pub fn on_transport_error(&self, channel_id: &ChannelId, reason: &str) {
        tracing::warn!(channel_id = %channel_id, reason, "Transport error on channel");
        self.on_disconnect(channel_id);
    }

    /// Push to every connected channel, authenticated or not.
    pub async fn broadcast(&self, message: PushMessage) -> usize {
        let targets: Vec<ChannelId> = {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            state.channels.keys().cloned().collect()
        };
        self.deliver(&targets, &message).await
    }

    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_user
            .contains_key(user_id)
    }

    /// Channels currently bound to a user, sorted.
    pub fn channels_for(&self, user_id: &UserId) -> Vec<ChannelId> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let mut channels: Vec<ChannelId> = state
            .by_user
            .get(user_id)
            .map(|owned| owned.iter().cloned().collect())
            .unwrap_or_default();
        channels.sort();
        channels
    }

    pub fn connection_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .channels
            .len()
    }

    pub fn authenticated_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .channels
            .values()
            .filter(|entry| entry.user_id.is_some())
            .count()
    }

    async fn deliver(&self, targets: &[ChannelId], message: &PushMessage) -> usize {
        let mut delivered = 0;
        for channel_id in targets {
            match self.transport.send(channel_id, message).await {
                Ok(()) => delivered += 1,
                Err(e) => self.on_transport_error(channel_id, &e.to_string()),
            }
        }
        delivered
    }
}

#[async_trait]
impl LivePush for ConnectionRegistry {
    async fn send_to_user(&self, user_id: &UserId, message: PushMessage) -> usize {
        let targets = self.channels_for(user_id);
        if targets.is_empty() {
            tracing::debug!(user_id = %user_id, "No live channel for user, skipping push");
            return 0;
        }
        self.deliver(&targets, &message).await
    }
}
