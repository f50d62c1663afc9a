//! The immutable event record carried by the bus.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{DomainError, EventId, TenantId, Timestamp, UserId};

use super::{EventKind, EventPayload};

/// Immutable record of a domain occurrence.
///
/// Fields are private: once built, an event is only read. The kind is
/// always derived from the payload, so the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    id: EventId,
    #[serde(rename = "type")]
    kind: EventKind,
    timestamp: Timestamp,
    tenant_id: TenantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    actor_user_id: Option<UserId>,
    payload: EventPayload,
}

impl Event {
    /// Builds an event with a fresh id and the current time.
    pub fn new(tenant_id: TenantId, payload: impl Into<EventPayload>) -> Self {
        let payload = payload.into();
        Self {
            id: EventId::new(),
            kind: payload.kind(),
            timestamp: Timestamp::now(),
            tenant_id,
            actor_user_id: None,
            payload,
        }
    }

    /// Records which user triggered the action.
    pub fn with_actor(mut self, actor: UserId) -> Self {
        self.actor_user_id = Some(actor);
        self
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn actor_user_id(&self) -> Option<&UserId> {
        self.actor_user_id.as_ref()
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }
}

/// Loosely-typed event as it arrives from JSON or another process boundary.
///
/// Converting to [`Event`] is where unknown tags are rejected with
/// `InvalidEventKind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_user_id: Option<String>,
    pub payload: JsonValue,
}

impl RawEvent {
    pub fn new(
        event_type: impl Into<String>,
        tenant_id: impl Into<String>,
        payload: JsonValue,
    ) -> Self {
        Self {
            id: None,
            event_type: event_type.into(),
            timestamp: None,
            tenant_id: tenant_id.into(),
            actor_user_id: None,
            payload,
        }
    }
}

impl TryFrom<RawEvent> for Event {
    type Error = DomainError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let kind = EventKind::parse(&raw.event_type)?;
        let payload = EventPayload::from_value(kind, raw.payload)?;
        let tenant_id = TenantId::new(raw.tenant_id)?;
        let actor_user_id = raw.actor_user_id.map(UserId::new).transpose()?;

        Ok(Self {
            id: raw.id.unwrap_or_default(),
            kind,
            timestamp: raw.timestamp.unwrap_or_default(),
            tenant_id,
            actor_user_id,
            payload,
        })
    }
}

impl From<&Event> for RawEvent {
    fn from(event: &Event) -> Self {
        Self {
            id: Some(event.id),
            event_type: event.kind.as_str().to_string(),
            timestamp: Some(event.timestamp),
            tenant_id: event.tenant_id.to_string(),
            actor_user_id: event.actor_user_id.as_ref().map(|u| u.to_string()),
            payload: event.payload.to_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::LessonCreated;
    use crate::domain::foundation::{CourseId, ErrorCode, LessonId};
    use serde_json::json;

    fn lesson_created() -> LessonCreated {
        LessonCreated {
            lesson_id: LessonId::new("l-1").unwrap(),
            course_id: CourseId::new("c-1").unwrap(),
            instructor_id: UserId::new("i-1").unwrap(),
            lesson_title: "Borrowing".to_string(),
            course_title: "Rust 101".to_string(),
        }
    }

    fn tenant() -> TenantId {
        TenantId::new("t-1").unwrap()
    }

    #[test]
    fn kind_is_derived_from_payload() {
        let event = Event::new(tenant(), lesson_created());
        assert_eq!(event.kind(), EventKind::LessonCreated);
        assert!(event.actor_user_id().is_none());
    }

    #[test]
    fn each_event_gets_a_fresh_id() {
        let a = Event::new(tenant(), lesson_created());
        let b = Event::new(tenant(), lesson_created());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::new(tenant(), lesson_created()).with_actor(UserId::new("i-1").unwrap());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "lesson.created.v1");
        assert_eq!(value["tenant_id"], "t-1");
        assert_eq!(value["actor_user_id"], "i-1");
        assert_eq!(value["payload"]["lesson_title"], "Borrowing");
    }

    #[test]
    fn json_roundtrip_preserves_event() {
        let event = Event::new(tenant(), lesson_created());
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn raw_event_with_unknown_type_is_rejected() {
        let raw = RawEvent::new("lesson.archived.v1", "t-1", json!({}));
        let err = Event::try_from(raw).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEventKind);
    }

    #[test]
    fn raw_event_with_empty_tenant_is_rejected() {
        let raw = RawEvent::from(&Event::new(tenant(), lesson_created()));
        let raw = RawEvent {
            tenant_id: String::new(),
            ..raw
        };
        let err = Event::try_from(raw).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyField);
    }

    #[test]
    fn raw_event_without_id_gets_one() {
        let raw = RawEvent::new(
            "lesson.completed.v1",
            "t-1",
            json!({ "user_id": "u-1", "lesson_id": "l-1", "course_id": "c-1" }),
        );
        let event = Event::try_from(raw).unwrap();
        assert_eq!(event.kind(), EventKind::LessonCompleted);
    }
}
