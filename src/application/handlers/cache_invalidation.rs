//! CacheInvalidationHandler - drops cached reads made stale by domain events.
//!
//! The bus-driven counterpart of write-path invalidation: whatever a
//! mutating event could change is invalidated coarsely, by entity pattern.

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::cache::CacheLayer;
use crate::domain::events::{Event, EventKind, EventPayload};
use crate::domain::foundation::DomainError;
use crate::ports::{EventHandler, EventSubscriber};

/// One `invalidate_entity` call: entity name plus optional id.
pub type InvalidationTarget = (&'static str, Option<String>);

/// Entity caches each event kind makes stale.
pub fn invalidation_targets(event: &Event) -> Vec<InvalidationTarget> {
    match event.payload() {
        EventPayload::LessonCreated(p) => vec![
            ("lesson", Some(p.course_id.to_string())),
            ("course", Some(p.course_id.to_string())),
        ],
        // Titles appear in catalog listings, so every course read goes.
        EventPayload::CoursePublished(_) | EventPayload::CourseUpdated(_) => {
            vec![("course", None)]
        }
        EventPayload::UserEnrolled(p) => vec![
            ("enrollment", Some(p.user_id.to_string())),
            ("course", Some(p.course_id.to_string())),
        ],
        EventPayload::AssignmentGraded(p) => {
            vec![("enrollment", Some(p.student_id.to_string()))]
        }
        EventPayload::LessonCompleted(p) => {
            vec![("enrollment", Some(p.user_id.to_string()))]
        }
    }
}

/// Event handler invalidating entity caches.
pub struct CacheInvalidationHandler {
    cache: Arc<CacheLayer>,
}

impl CacheInvalidationHandler {
    pub fn new(cache: Arc<CacheLayer>) -> Self {
        Self { cache }
    }

    /// Subscribe to every event kind.
    pub fn register(self: &Arc<Self>, subscriber: &dyn EventSubscriber) {
        let handler: Arc<dyn EventHandler> = Arc::clone(self) as Arc<dyn EventHandler>;
        subscriber.subscribe_all(&EventKind::ALL, handler);
    }
}

#[async_trait]
impl EventHandler for CacheInvalidationHandler {
    async fn handle(&self, event: &Event) -> Result<(), DomainError> {
        let mut removed = 0;
        for (entity, id) in invalidation_targets(event) {
            removed += self.cache.invalidate_entity(entity, id.as_deref()).await;
        }

        tracing::debug!(
            event_id = %event.id(),
            event_type = %event.kind(),
            removed,
            "Caches invalidated for event"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "CacheInvalidationHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryCacheBackend;
    use crate::config::CacheConfig;
    use crate::domain::events::{CourseUpdated, UserEnrolled};
    use crate::domain::foundation::{CourseId, TenantId, Timestamp, UserId};
    use crate::ports::CacheBackend;

    fn tenant() -> TenantId {
        TenantId::new("t-1").unwrap()
    }

    async fn seeded_backend() -> Arc<InMemoryCacheBackend> {
        let backend = Arc::new(InMemoryCacheBackend::new());
        for key in [
            "course:get:c-1",
            "course:list:t-1",
            "lesson:list:c-1",
            "enrollment:list:u-1",
            "enrollment:list:u-2",
        ] {
            backend.set(key, vec![1], 300).await.unwrap();
        }
        backend
    }

    fn handler(backend: Arc<InMemoryCacheBackend>) -> CacheInvalidationHandler {
        CacheInvalidationHandler::new(Arc::new(CacheLayer::new(backend, &CacheConfig::default())))
    }

    #[tokio::test]
    async fn course_update_drops_all_course_reads() {
        let backend = seeded_backend().await;
        let event = Event::new(
            tenant(),
            CourseUpdated {
                course_id: CourseId::new("c-1").unwrap(),
                course_title: "Rust 102".to_string(),
                summary: None,
            },
        );

        handler(backend.clone()).handle(&event).await.unwrap();

        assert!(backend.get("course:get:c-1").await.unwrap().is_none());
        assert!(backend.get("course:list:t-1").await.unwrap().is_none());
        assert!(backend.get("lesson:list:c-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn enrollment_drops_that_users_enrollment_reads() {
        let backend = seeded_backend().await;
        let event = Event::new(
            tenant(),
            UserEnrolled {
                user_id: UserId::new("u-1").unwrap(),
                course_id: CourseId::new("c-1").unwrap(),
                course_title: "Rust 101".to_string(),
                enrolled_at: Timestamp::now(),
            },
        );

        handler(backend.clone()).handle(&event).await.unwrap();

        assert!(backend.get("enrollment:list:u-1").await.unwrap().is_none());
        assert!(backend.get("enrollment:list:u-2").await.unwrap().is_some());
        assert!(backend.get("course:get:c-1").await.unwrap().is_none());
        assert!(backend.get("course:list:t-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unavailable_cache_does_not_fail_handler() {
        let backend = seeded_backend().await;
        backend.set_available(false);
        let event = Event::new(
            tenant(),
            CourseUpdated {
                course_id: CourseId::new("c-1").unwrap(),
                course_title: "Rust 102".to_string(),
                summary: None,
            },
        );

        assert!(handler(backend).handle(&event).await.is_ok());
    }
}
