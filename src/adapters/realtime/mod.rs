//! Live delivery to connected clients.
//!
//! # Architecture
//!
//! ```text
//! NotificationDispatcher ──send_to_user──▶ ConnectionRegistry
//!                                              │ send(channel, msg)
//!                                              ▼
//!                                         WebSocketTransport
//!                                         ├── outbox ch-a ──▶ socket
//!                                         └── outbox ch-b ──▶ socket
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`registry`] - Channel/user bookkeeping and fan-out
//! - [`transport`] - Per-socket outboxes
//! - [`handler`] - Axum upgrade handler and health route

pub mod handler;
pub mod messages;
pub mod registry;
pub mod transport;

pub use handler::{realtime_router, RealtimeState};
pub use messages::{ClientMessage, ServerMessage};
pub use registry::ConnectionRegistry;
pub use transport::WebSocketTransport;
