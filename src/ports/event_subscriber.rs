//! EventSubscriber port - Interface for subscribing to domain events.
//!
//! Handlers register interest in event kinds without knowing how the bus
//! schedules them.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::events::{Event, EventKind};
use crate::domain::foundation::DomainError;

/// Handler for processing domain events.
///
/// Implementations should be:
/// - **Read-only on the event** - events are shared between handlers
/// - **Quick** - long operations should be queued elsewhere
/// - **Self-contained** - a returned error is logged and swallowed by the bus
///
/// # Example
///
/// ```ignore
/// struct AuditTrail { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for AuditTrail {
///     async fn handle(&self, event: &Event) -> Result<(), DomainError> {
///         // ...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "AuditTrail"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    async fn handle(&self, event: &Event) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
///
/// Registration order per kind is preserved. No deduplication is performed:
/// registering the same handler twice makes it run twice.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event kind.
    fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>);

    /// Subscribe handler to several event kinds.
    fn subscribe_all(&self, kinds: &[EventKind], handler: Arc<dyn EventHandler>) {
        for kind in kinds {
            self.subscribe(*kind, Arc::clone(&handler));
        }
    }

    /// Remove a handler registration. Returns whether one was removed.
    ///
    /// Handlers are matched by identity (the same `Arc`); if the handler was
    /// registered more than once, the earliest registration is removed.
    fn unsubscribe(&self, kind: EventKind, handler: &Arc<dyn EventHandler>) -> bool;

    /// Number of handlers currently registered for a kind.
    fn listener_count(&self, kind: EventKind) -> usize;
}

/// Combined trait for event bus implementations.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}
