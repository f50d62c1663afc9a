//! NotificationDispatcher - turns domain events into per-recipient notifications.
//!
//! For each notifying event:
//! 1. Render the shared content and resolve recipients
//! 2. Persist one record per recipient, skipping recipients whose save fails
//! 3. Push each persisted record live, then the recipient's unread count
//!
//! Live delivery is best-effort. A recipient without a live channel is the
//! normal offline case and only shows up in debug logs.

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::cache::CacheLayer;
use crate::domain::events::Event;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::notification::{NotificationContent, NotificationRecord, NOTIFYING_KINDS};
use crate::ports::{
    EventHandler, EventSubscriber, LivePush, NotificationStore, PushMessage, RecipientResolver,
};

/// Outcome of fanning one event out to its recipients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub recipients: usize,
    pub persisted: usize,
    pub failed: usize,
    /// Recipients reached on at least one live channel.
    pub delivered_live: usize,
}

/// Event handler that creates, stores and pushes notifications.
pub struct NotificationDispatcher {
    resolver: Arc<dyn RecipientResolver>,
    store: Arc<dyn NotificationStore>,
    push: Arc<dyn LivePush>,
    cache: Option<Arc<CacheLayer>>,
}

impl NotificationDispatcher {
    pub fn new(
        resolver: Arc<dyn RecipientResolver>,
        store: Arc<dyn NotificationStore>,
        push: Arc<dyn LivePush>,
    ) -> Self {
        Self {
            resolver,
            store,
            push,
            cache: None,
        }
    }

    /// Invalidate `notification:*:<user>` entries after each persisted record.
    pub fn with_cache(mut self, cache: Arc<CacheLayer>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Subscribe this dispatcher to every notifying event kind.
    pub fn register(self: &Arc<Self>, subscriber: &dyn EventSubscriber) {
        let handler: Arc<dyn EventHandler> = Arc::clone(self) as Arc<dyn EventHandler>;
        subscriber.subscribe_all(NOTIFYING_KINDS, handler);
    }

    /// Fan one event out. Fails only when recipients cannot be resolved.
    pub async fn dispatch(&self, event: &Event) -> Result<FanOutReport, DomainError> {
        let Some(content) = NotificationContent::for_event(event) else {
            return Ok(FanOutReport::default());
        };

        let recipients = self.resolver.resolve_recipients(event).await?;
        let mut report = FanOutReport {
            recipients: recipients.len(),
            ..Default::default()
        };

        for user_id in recipients {
            let record =
                NotificationRecord::new(user_id, event.tenant_id().clone(), &content, event.id());

            if let Err(e) = self.store.save(&record).await {
                tracing::error!(
                    event_id = %event.id(),
                    event_type = %event.kind(),
                    user_id = %record.user_id,
                    error = %e,
                    "Failed to persist notification, skipping recipient"
                );
                report.failed += 1;
                continue;
            }
            report.persisted += 1;

            if let Some(cache) = &self.cache {
                cache
                    .invalidate_entity("notification", Some(record.user_id.as_str()))
                    .await;
            }

            if self.push_live(&record).await {
                report.delivered_live += 1;
            }
        }

        Ok(report)
    }

    /// Push the record and the refreshed unread count. Returns whether any
    /// channel took the record.
    async fn push_live(&self, record: &NotificationRecord) -> bool {
        let user_id: &UserId = &record.user_id;
        let delivered = self
            .push
            .send_to_user(
                user_id,
                PushMessage::Notification {
                    notification: record.clone(),
                },
            )
            .await;

        if delivered == 0 {
            tracing::debug!(user_id = %user_id, notification_id = %record.id, "Recipient offline");
            return false;
        }

        match self.store.unread_count(user_id, &record.tenant_id).await {
            Ok(count) => {
                self.push
                    .send_to_user(user_id, PushMessage::UnreadCount { count })
                    .await;
            }
            Err(e) => {
                tracing::debug!(user_id = %user_id, error = %e, "Unread count unavailable");
            }
        }
        true
    }
}

#[async_trait]
impl EventHandler for NotificationDispatcher {
    async fn handle(&self, event: &Event) -> Result<(), DomainError> {
        let report = self.dispatch(event).await?;

        tracing::info!(
            event_id = %event.id(),
            event_type = %event.kind(),
            recipients = report.recipients,
            persisted = report.persisted,
            failed = report.failed,
            delivered_live = report.delivered_live,
            "Notifications dispatched"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "NotificationDispatcher"
    }
}
