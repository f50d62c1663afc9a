//! Notification records and the content rendered from events.

mod content;
mod record;

pub use content::{NotificationContent, NOTIFYING_KINDS};
pub use record::{NotificationKind, NotificationRecord};
