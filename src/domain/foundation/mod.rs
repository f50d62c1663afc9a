//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps and error types that form the
//! vocabulary of the notification subsystem.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    ChannelId, CourseId, EventId, LessonId, NotificationId, SubmissionId, TenantId, UserId,
};
pub use timestamp::Timestamp;
