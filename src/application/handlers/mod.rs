//! Event handlers registered on the bus.
//!
//! - `NotificationDispatcher` - persists and pushes notifications
//! - `CacheInvalidationHandler` - invalidates entity caches

mod cache_invalidation;
mod notification_dispatcher;

pub use cache_invalidation::{invalidation_targets, CacheInvalidationHandler, InvalidationTarget};
pub use notification_dispatcher::{FanOutReport, NotificationDispatcher};
