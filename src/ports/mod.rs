//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the core and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Emitting domain events, returning a `Dispatch` handle
//! - `EventSubscriber` - Registering handlers per event kind
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Notification Ports
//!
//! - `RecipientResolver` / `EnrollmentDirectory` - Who receives a notification
//! - `NotificationStore` - Persistence of notification records
//! - `ChannelTransport` / `LivePush` - Live delivery to connected clients
//!
//! ## Cache Ports
//!
//! - `CacheBackend` - Byte-oriented key/value storage with TTL

mod cache_backend;
mod event_publisher;
mod event_subscriber;
mod live_push;
mod notification_store;
mod recipient_resolver;

pub use cache_backend::{escape_glob, CacheBackend, CacheError};
pub use event_publisher::{Dispatch, DispatchSummary, EventPublisher};
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use live_push::{ChannelTransport, LivePush, PushMessage, TransportError};
pub use notification_store::NotificationStore;
pub use recipient_resolver::{EnrollmentDirectory, RecipientResolver};
