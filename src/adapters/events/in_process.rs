//! In-process event bus.
//!
//! Explicitly constructed and injected from the composition root; there is
//! no global instance. Tests build a fresh bus per case.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::EventBusConfig;
use crate::domain::events::{Event, EventKind};
use crate::domain::foundation::DomainError;
use crate::ports::{Dispatch, EventHandler, EventPublisher, EventSubscriber};

use super::dispatch::{spawn_dispatch, StartSequencer};

/// Publish/subscribe bus dispatching within the current process.
///
/// Features:
/// - Registration table keyed by [`EventKind`], insertion order preserved
/// - Each emit spawns one isolated dispatch (see [`Dispatch`])
/// - Handlers of consecutive emits start in emit order, on any runtime flavor
/// - A per-kind listener threshold that only logs a leak warning
///
/// # Thread Safety
///
/// The registration table sits behind an `RwLock`. Emits clone the handler
/// list under the read lock, so they never observe a half-applied
/// subscribe or unsubscribe.
pub struct InProcessEventBus {
    handlers: RwLock<HashMap<EventKind, Vec<Arc<dyn EventHandler>>>>,
    max_listeners: usize,
    sequencer: StartSequencer,
}

impl InProcessEventBus {
    /// Creates an empty bus with the given listener warning threshold.
    pub fn new(max_listeners: usize) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            max_listeners,
            sequencer: StartSequencer::default(),
        }
    }

    /// Creates an empty bus from configuration.
    pub fn from_config(config: &EventBusConfig) -> Self {
        Self::new(config.max_listeners)
    }

    /// Snapshot of the handlers for a kind, in registration order.
    fn handlers_for(&self, kind: EventKind) -> Vec<Arc<dyn EventHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for InProcessEventBus {
    fn default() -> Self {
        Self::from_config(&EventBusConfig::default())
    }
}

#[async_trait]
impl EventPublisher for InProcessEventBus {
    async fn emit(&self, event: Event) -> Result<Dispatch, DomainError> {
        let handlers = self.handlers_for(event.kind());

        if handlers.is_empty() {
            tracing::debug!(
                event_id = %event.id(),
                event_type = %event.kind(),
                "No handlers registered for event"
            );
            return Ok(Dispatch::empty());
        }

        tracing::debug!(
            event_id = %event.id(),
            event_type = %event.kind(),
            tenant_id = %event.tenant_id(),
            handlers = handlers.len(),
            "Dispatching event"
        );

        Ok(spawn_dispatch(&self.sequencer, event, handlers))
    }
}

impl EventSubscriber for InProcessEventBus {
    fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let registered = handlers.entry(kind).or_default();
        registered.push(handler);

        if registered.len() > self.max_listeners {
            tracing::warn!(
                event_type = %kind,
                listeners = registered.len(),
                max_listeners = self.max_listeners,
                "Listener count exceeds threshold, possible handler leak"
            );
        }
    }

    fn unsubscribe(&self, kind: EventKind, handler: &Arc<dyn EventHandler>) -> bool {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(registered) = handlers.get_mut(&kind) else {
            return false;
        };
        let Some(position) = registered.iter().position(|h| Arc::ptr_eq(h, handler)) else {
            return false;
        };

        registered.remove(position);
        if registered.is_empty() {
            handlers.remove(&kind);
        }
        true
    }

    fn listener_count(&self, kind: EventKind) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }
}
