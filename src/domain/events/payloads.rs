//! Per-kind payload schemas.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, LessonId, SubmissionId, Timestamp, UserId,
};

use super::EventKind;

/// A lesson was added to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonCreated {
    pub lesson_id: LessonId,
    pub course_id: CourseId,
    pub instructor_id: UserId,
    pub lesson_title: String,
    pub course_title: String,
}

/// A course became visible to the tenant's students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePublished {
    pub course_id: CourseId,
    pub instructor_id: UserId,
    pub course_title: String,
}

/// Course metadata changed after publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseUpdated {
    pub course_id: CourseId,
    pub course_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A user enrolled in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnrolled {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub course_title: String,
    pub enrolled_at: Timestamp,
}

/// An instructor graded a student's submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentGraded {
    pub submission_id: SubmissionId,
    pub student_id: UserId,
    pub course_id: CourseId,
    pub assignment_title: String,
    pub score: u32,
    pub max_score: u32,
}

/// A student finished a lesson. Drives cache invalidation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonCompleted {
    pub user_id: UserId,
    pub lesson_id: LessonId,
    pub course_id: CourseId,
}

/// Tagged union of every payload shape.
///
/// The variant determines the [`EventKind`]; handlers match on it
/// exhaustively instead of probing a free-form map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    LessonCreated(LessonCreated),
    CoursePublished(CoursePublished),
    CourseUpdated(CourseUpdated),
    UserEnrolled(UserEnrolled),
    AssignmentGraded(AssignmentGraded),
    LessonCompleted(LessonCompleted),
}

impl EventPayload {
    /// The kind this payload belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::LessonCreated(_) => EventKind::LessonCreated,
            EventPayload::CoursePublished(_) => EventKind::CoursePublished,
            EventPayload::CourseUpdated(_) => EventKind::CourseUpdated,
            EventPayload::UserEnrolled(_) => EventKind::UserEnrolled,
            EventPayload::AssignmentGraded(_) => EventKind::AssignmentGraded,
            EventPayload::LessonCompleted(_) => EventKind::LessonCompleted,
        }
    }

    /// Course the event concerns. Every current kind is course-scoped.
    pub fn course_id(&self) -> &CourseId {
        match self {
            EventPayload::LessonCreated(p) => &p.course_id,
            EventPayload::CoursePublished(p) => &p.course_id,
            EventPayload::CourseUpdated(p) => &p.course_id,
            EventPayload::UserEnrolled(p) => &p.course_id,
            EventPayload::AssignmentGraded(p) => &p.course_id,
            EventPayload::LessonCompleted(p) => &p.course_id,
        }
    }

    /// Decodes a JSON payload into the schema selected by `kind`.
    pub fn from_value(kind: EventKind, value: JsonValue) -> Result<Self, DomainError> {
        let decoded = match kind {
            EventKind::LessonCreated => serde_json::from_value(value).map(Self::LessonCreated),
            EventKind::CoursePublished => {
                serde_json::from_value(value).map(Self::CoursePublished)
            }
            EventKind::CourseUpdated => serde_json::from_value(value).map(Self::CourseUpdated),
            EventKind::UserEnrolled => serde_json::from_value(value).map(Self::UserEnrolled),
            EventKind::AssignmentGraded => {
                serde_json::from_value(value).map(Self::AssignmentGraded)
            }
            EventKind::LessonCompleted => {
                serde_json::from_value(value).map(Self::LessonCompleted)
            }
        };

        decoded.map_err(|e| {
            DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Payload does not match {}: {}", kind, e),
            )
            .with_detail("event_type", kind.as_str())
        })
    }

    /// Encodes the payload body (without the kind tag) as JSON.
    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

impl Serialize for EventPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EventPayload::LessonCreated(p) => p.serialize(serializer),
            EventPayload::CoursePublished(p) => p.serialize(serializer),
            EventPayload::CourseUpdated(p) => p.serialize(serializer),
            EventPayload::UserEnrolled(p) => p.serialize(serializer),
            EventPayload::AssignmentGraded(p) => p.serialize(serializer),
            EventPayload::LessonCompleted(p) => p.serialize(serializer),
        }
    }
}

macro_rules! payload_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for EventPayload {
                fn from(payload: $variant) -> Self {
                    EventPayload::$variant(payload)
                }
            }
        )*
    };
}

payload_from!(
    LessonCreated,
    CoursePublished,
    CourseUpdated,
    UserEnrolled,
    AssignmentGraded,
    LessonCompleted,
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn enrolled() -> UserEnrolled {
        UserEnrolled {
            user_id: UserId::new("u-1").unwrap(),
            course_id: CourseId::new("c-1").unwrap(),
            course_title: "Rust 101".to_string(),
            enrolled_at: Timestamp::from_unix_secs(1_700_000_000),
        }
    }

    #[test]
    fn payload_reports_its_kind() {
        let payload: EventPayload = enrolled().into();
        assert_eq!(payload.kind(), EventKind::UserEnrolled);
        assert_eq!(payload.course_id().as_str(), "c-1");
    }

    #[test]
    fn serializes_without_a_tag() {
        let value = EventPayload::from(enrolled()).to_value();
        assert_eq!(value["user_id"], "u-1");
        assert!(value.get("type").is_none());
    }

    #[test]
    fn from_value_decodes_matching_schema() {
        let value = json!({
            "course_id": "c-9",
            "instructor_id": "i-1",
            "course_title": "Ownership"
        });
        let payload = EventPayload::from_value(EventKind::CoursePublished, value).unwrap();
        assert!(matches!(payload, EventPayload::CoursePublished(_)));
    }

    #[test]
    fn from_value_rejects_mismatched_schema() {
        let value = json!({ "course_id": "c-9" });
        let err = EventPayload::from_value(EventKind::LessonCreated, value).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn from_value_rejects_empty_identifiers() {
        let value = json!({
            "user_id": "",
            "lesson_id": "l-1",
            "course_id": "c-1"
        });
        assert!(EventPayload::from_value(EventKind::LessonCompleted, value).is_err());
    }
}
