//! Application layer - caching and event handlers.
//!
//! Orchestrates ports without knowing which adapters sit behind them.

pub mod cache;
pub mod handlers;
mod recipients;

pub use cache::{CacheKey, CacheLayer};
pub use handlers::{CacheInvalidationHandler, FanOutReport, NotificationDispatcher};
pub use recipients::EnrollmentRecipientResolver;
