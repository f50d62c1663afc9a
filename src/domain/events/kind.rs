//! Closed, versioned set of event tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::DomainError;

/// Every domain event kind the bus can carry.
///
/// Tags carry an explicit version suffix. A new payload shape means a new
/// variant (and a new tag), never a wider existing payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventKind {
    LessonCreated,
    CoursePublished,
    CourseUpdated,
    UserEnrolled,
    AssignmentGraded,
    LessonCompleted,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [EventKind; 6] = [
        EventKind::LessonCreated,
        EventKind::CoursePublished,
        EventKind::CourseUpdated,
        EventKind::UserEnrolled,
        EventKind::AssignmentGraded,
        EventKind::LessonCompleted,
    ];

    /// Wire tag, e.g. `lesson.created.v1`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::LessonCreated => "lesson.created.v1",
            EventKind::CoursePublished => "course.published.v1",
            EventKind::CourseUpdated => "course.updated.v1",
            EventKind::UserEnrolled => "user.enrolled.v1",
            EventKind::AssignmentGraded => "assignment.graded.v1",
            EventKind::LessonCompleted => "lesson.completed.v1",
        }
    }

    /// Schema version encoded in the tag suffix.
    pub fn schema_version(&self) -> u32 {
        match self {
            EventKind::LessonCreated
            | EventKind::CoursePublished
            | EventKind::CourseUpdated
            | EventKind::UserEnrolled
            | EventKind::AssignmentGraded
            | EventKind::LessonCompleted => 1,
        }
    }

    /// Parses a wire tag, rejecting anything outside the taxonomy.
    pub fn parse(tag: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| DomainError::invalid_event_kind(tag))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EventKind {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn every_kind_parses_from_its_own_tag() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn tags_are_unique() {
        let mut tags: Vec<&str> = EventKind::ALL.iter().map(|k| k.as_str()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), EventKind::ALL.len());
    }

    #[test]
    fn unknown_tag_is_invalid_event_kind() {
        let err = EventKind::parse("lesson.deleted.v1").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEventKind);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        assert!(EventKind::parse("lesson.created.v2").is_err());
        assert!(EventKind::parse("lesson.created").is_err());
    }

    #[test]
    fn serializes_as_tag_string() {
        let json = serde_json::to_string(&EventKind::UserEnrolled).unwrap();
        assert_eq!(json, "\"user.enrolled.v1\"");

        let kind: EventKind = serde_json::from_str("\"course.published.v1\"").unwrap();
        assert_eq!(kind, EventKind::CoursePublished);
    }

    #[test]
    fn schema_version_matches_tag_suffix() {
        for kind in EventKind::ALL {
            let suffix = format!(".v{}", kind.schema_version());
            assert!(kind.as_str().ends_with(&suffix));
        }
    }
}
