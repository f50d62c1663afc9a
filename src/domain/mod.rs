//! Domain layer containing the event and notification vocabulary.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `events` - Event envelope and the closed event taxonomy
//! - `notification` - Notification records and per-event content

pub mod events;
pub mod foundation;
pub mod notification;
