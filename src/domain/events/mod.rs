//! Event envelope and taxonomy.
//!
//! - [`EventKind`] - closed, versioned set of tags
//! - [`EventPayload`] - tagged union of per-kind payload schemas
//! - [`Event`] - immutable record dispatched through the bus
//! - [`RawEvent`] - loosely-typed form accepted at process boundaries

mod envelope;
mod kind;
mod payloads;

pub use envelope::{Event, RawEvent};
pub use kind::EventKind;
pub use payloads::{
    AssignmentGraded, CoursePublished, CourseUpdated, EventPayload, LessonCompleted,
    LessonCreated, UserEnrolled,
};
