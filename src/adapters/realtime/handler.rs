//! WebSocket upgrade handler for live notification channels.
//!
//! Connection lifecycle:
//! 1. Upgrade to WebSocket and open an outbox
//! 2. Register the channel (unauthenticated) and send `connected`
//! 3. Client sends `authenticate` to bind the channel to a user
//! 4. Forward outbox messages and answer client messages until disconnect
//! 5. Remove the channel from the registry

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use serde_json::json;

use crate::domain::foundation::ChannelId;

use super::{
    messages::{ClientMessage, ServerMessage},
    registry::ConnectionRegistry,
    transport::WebSocketTransport,
};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct RealtimeState {
    pub registry: Arc<ConnectionRegistry>,
    pub transport: Arc<WebSocketTransport>,
}

impl RealtimeState {
    pub fn new(registry: Arc<ConnectionRegistry>, transport: Arc<WebSocketTransport>) -> Self {
        Self {
            registry,
            transport,
        }
    }
}

/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<RealtimeState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Route: `GET /health`
pub async fn health_handler(State(state): State<RealtimeState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "connections": state.registry.connection_count(),
        "authenticated": state.registry.authenticated_count(),
    }))
}

/// Runs for the lifetime of one connection.
async fn handle_socket(socket: WebSocket, state: RealtimeState) {
    let (mut sender, mut receiver) = socket.split();

    let channel_id = ChannelId::new();
    let mut outbox = state.transport.open(&channel_id);
    state.registry.on_connect(channel_id.clone());

    if state
        .transport
        .enqueue(&channel_id, ServerMessage::connected(channel_id.as_str()))
        .is_err()
    {
        cleanup(&state, &channel_id);
        return;
    }

    // Outbox → socket
    let mut send_task = {
        let registry = state.registry.clone();
        let channel_id = channel_id.clone();
        tokio::spawn(async move {
            while let Some(message) = outbox.recv().await {
                let text = match serde_json::to_string(&message) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(channel_id = %channel_id, error = %e, "Failed to encode message");
                        continue;
                    }
                };
                if let Err(e) = sender.send(Message::Text(text)).await {
                    registry.on_transport_error(&channel_id, &e.to_string());
                    break;
                }
            }
        })
    };

    // Socket → registry
    let mut recv_task = {
        let state = state.clone();
        let channel_id = channel_id.clone();
        tokio::spawn(async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Text(text)) => handle_client_text(&state, &channel_id, &text),
                    Ok(Message::Binary(_)) => {
                        tracing::warn!(channel_id = %channel_id, "Received unsupported binary message");
                    }
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                    Ok(Message::Close(_)) => {
                        tracing::debug!(channel_id = %channel_id, "Client sent close frame");
                        break;
                    }
                    Err(e) => {
                        state.registry.on_transport_error(&channel_id, &e.to_string());
                        break;
                    }
                }
            }
        })
    };

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    cleanup(&state, &channel_id);
}

fn handle_client_text(state: &RealtimeState, channel_id: &ChannelId, text: &str) {
    let reply = match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Authenticate { user_id }) => {
            if state.registry.authenticate(channel_id, &user_id) {
                ServerMessage::Authenticated { user_id }
            } else {
                ServerMessage::error("AUTHENTICATION_FAILED", "user_id must not be empty")
            }
        }
        Ok(ClientMessage::Ping) => {
            tracing::trace!(channel_id = %channel_id, "Received ping");
            ServerMessage::pong()
        }
        Err(e) => ServerMessage::error("INVALID_MESSAGE", e.to_string()),
    };

    if let Err(e) = state.transport.enqueue(channel_id, reply) {
        tracing::debug!(channel_id = %channel_id, error = %e, "Failed to queue reply");
    }
}

fn cleanup(state: &RealtimeState, channel_id: &ChannelId) {
    state.registry.on_disconnect(channel_id);
    state.transport.close(channel_id);
}

/// Router exposing `/ws` and `/health`.
pub fn realtime_router() -> Router<RealtimeState> {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn state() -> RealtimeState {
        let transport = Arc::new(WebSocketTransport::new());
        let registry = Arc::new(ConnectionRegistry::new(transport.clone()));
        RealtimeState::new(registry, transport)
    }

    #[tokio::test]
    async fn authenticate_message_binds_channel_and_replies() {
        let state = state();
        let channel = ChannelId::from_string("ch-1");
        let mut outbox = state.transport.open(&channel);
        state.registry.on_connect(channel.clone());

        handle_client_text(&state, &channel, r#"{"type":"authenticate","user_id":"u-1"}"#);

        assert!(state.registry.is_online(&UserId::new("u-1").unwrap()));
        assert_eq!(
            outbox.recv().await,
            Some(ServerMessage::Authenticated {
                user_id: "u-1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn empty_user_id_is_rejected_with_error_reply() {
        let state = state();
        let channel = ChannelId::from_string("ch-1");
        let mut outbox = state.transport.open(&channel);
        state.registry.on_connect(channel.clone());

        handle_client_text(&state, &channel, r#"{"type":"authenticate","user_id":""}"#);

        assert_eq!(state.registry.authenticated_count(), 0);
        assert!(matches!(
            outbox.recv().await,
            Some(ServerMessage::Error { code, .. }) if code == "AUTHENTICATION_FAILED"
        ));
    }

    #[tokio::test]
    async fn ping_gets_pong_and_garbage_gets_error() {
        let state = state();
        let channel = ChannelId::from_string("ch-1");
        let mut outbox = state.transport.open(&channel);

        handle_client_text(&state, &channel, r#"{"type":"ping"}"#);
        handle_client_text(&state, &channel, "not json");

        assert!(matches!(outbox.recv().await, Some(ServerMessage::Pong { .. })));
        assert!(matches!(
            outbox.recv().await,
            Some(ServerMessage::Error { code, .. }) if code == "INVALID_MESSAGE"
        ));
    }

    #[test]
    fn cleanup_removes_channel_everywhere() {
        let state = state();
        let channel = ChannelId::from_string("ch-1");
        let _outbox = state.transport.open(&channel);
        state.registry.on_connect(channel.clone());

        cleanup(&state, &channel);

        assert_eq!(state.registry.connection_count(), 0);
        assert!(state.transport.enqueue(&channel, ServerMessage::pong()).is_err());
    }

    #[test]
    fn realtime_router_creates_routes() {
        let _router: Router = realtime_router().with_state(state());
    }
}
