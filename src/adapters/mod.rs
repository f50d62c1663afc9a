//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the core to external systems:
//! - `events` - In-process event bus
//! - `http` - Event ingest route
//! - `realtime` - WebSocket transport and connection registry
//! - `cache` - In-memory and Redis cache backends
//! - `notifications` - Notification stores (in-memory, PostgreSQL)
//! - `directory` - Enrollment directories (in-memory, PostgreSQL)

pub mod cache;
pub mod directory;
pub mod events;
pub mod http;
pub mod notifications;
pub mod realtime;

pub use events::InProcessEventBus;
