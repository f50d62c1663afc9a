//! Persisted notification record.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    EventId, NotificationId, TenantId, Timestamp, UserId, ValidationError,
};

/// Category of a notification as shown to the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewLesson,
    CoursePublished,
    CourseUpdated,
    EnrollmentConfirmed,
    AssignmentGraded,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewLesson => "new_lesson",
            NotificationKind::CoursePublished => "course_published",
            NotificationKind::CourseUpdated => "course_updated",
            NotificationKind::EnrollmentConfirmed => "enrollment_confirmed",
            NotificationKind::AssignmentGraded => "assignment_graded",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_lesson" => Ok(NotificationKind::NewLesson),
            "course_published" => Ok(NotificationKind::CoursePublished),
            "course_updated" => Ok(NotificationKind::CourseUpdated),
            "enrollment_confirmed" => Ok(NotificationKind::EnrollmentConfirmed),
            "assignment_graded" => Ok(NotificationKind::AssignmentGraded),
            other => Err(ValidationError::invalid_format(
                "notification_kind",
                format!("unknown kind '{}'", other),
            )),
        }
    }
}

/// One notification for one recipient.
///
/// Created once per (event, recipient) pair. Only `is_read` changes
/// afterwards, and only through the store's read-marking operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub user_id: UserId,
    pub tenant_id: TenantId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub payload: JsonValue,
    /// Event that produced this record.
    pub source_event_id: EventId,
    pub is_read: bool,
    pub created_at: Timestamp,
}

impl NotificationRecord {
    /// Builds an unread record stamped with the current time.
    pub fn new(
        user_id: UserId,
        tenant_id: TenantId,
        content: &super::NotificationContent,
        source_event_id: EventId,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            tenant_id,
            kind: content.kind,
            title: content.title.clone(),
            message: content.message.clone(),
            payload: content.data.clone(),
            source_event_id,
            is_read: false,
            created_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationContent;
    use serde_json::json;

    #[test]
    fn kind_roundtrips_through_str() {
        for kind in [
            NotificationKind::NewLesson,
            NotificationKind::CoursePublished,
            NotificationKind::CourseUpdated,
            NotificationKind::EnrollmentConfirmed,
            NotificationKind::AssignmentGraded,
        ] {
            assert_eq!(kind.as_str().parse::<NotificationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_fails_to_parse() {
        assert!("weekly_digest".parse::<NotificationKind>().is_err());
    }

    #[test]
    fn new_record_is_unread() {
        let content = NotificationContent {
            kind: NotificationKind::NewLesson,
            title: "New lesson".to_string(),
            message: "Borrowing was added".to_string(),
            data: json!({ "lesson_id": "l-1" }),
        };
        let record = NotificationRecord::new(
            UserId::new("u-1").unwrap(),
            TenantId::new("t-1").unwrap(),
            &content,
            EventId::new(),
        );

        assert!(!record.is_read);
        assert_eq!(record.kind, NotificationKind::NewLesson);
        assert_eq!(record.payload["lesson_id"], "l-1");
    }
}
