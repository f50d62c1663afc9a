//! Rendering of events into recipient-facing notification content.

use serde_json::json;
use serde_json::Value as JsonValue;

use crate::domain::events::{Event, EventKind, EventPayload};

use super::NotificationKind;

/// Event kinds that produce notifications.
pub const NOTIFYING_KINDS: &[EventKind] = &[
    EventKind::LessonCreated,
    EventKind::CoursePublished,
    EventKind::CourseUpdated,
    EventKind::UserEnrolled,
    EventKind::AssignmentGraded,
];

/// Title, message and structured data shared by every recipient of one event.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContent {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: JsonValue,
}

impl NotificationContent {
    /// Renders the content for an event, or `None` for kinds that never notify.
    pub fn for_event(event: &Event) -> Option<Self> {
        let content = match event.payload() {
            EventPayload::LessonCreated(p) => Self {
                kind: NotificationKind::NewLesson,
                title: "New lesson available".to_string(),
                message: format!("\"{}\" was added to {}", p.lesson_title, p.course_title),
                data: json!({
                    "lesson_id": p.lesson_id,
                    "course_id": p.course_id,
                    "instructor_id": p.instructor_id,
                }),
            },
            EventPayload::CoursePublished(p) => Self {
                kind: NotificationKind::CoursePublished,
                title: "New course published".to_string(),
                message: format!("{} is now open for enrollment", p.course_title),
                data: json!({
                    "course_id": p.course_id,
                    "instructor_id": p.instructor_id,
                }),
            },
            EventPayload::CourseUpdated(p) => Self {
                kind: NotificationKind::CourseUpdated,
                title: "Course updated".to_string(),
                message: match &p.summary {
                    Some(summary) => format!("{}: {}", p.course_title, summary),
                    None => format!("{} has been updated", p.course_title),
                },
                data: json!({ "course_id": p.course_id }),
            },
            EventPayload::UserEnrolled(p) => Self {
                kind: NotificationKind::EnrollmentConfirmed,
                title: "Enrollment confirmed".to_string(),
                message: format!("You are now enrolled in {}", p.course_title),
                data: json!({
                    "course_id": p.course_id,
                    "enrolled_at": p.enrolled_at,
                }),
            },
            EventPayload::AssignmentGraded(p) => Self {
                kind: NotificationKind::AssignmentGraded,
                title: "Assignment graded".to_string(),
                message: format!(
                    "{} was graded: {}/{}",
                    p.assignment_title, p.score, p.max_score
                ),
                data: json!({
                    "submission_id": p.submission_id,
                    "course_id": p.course_id,
                    "score": p.score,
                    "max_score": p.max_score,
                }),
            },
            EventPayload::LessonCompleted(_) => return None,
        };

        Some(content)
    }
}
