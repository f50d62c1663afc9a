//! Notification store implementations.
//!
//! - `InMemoryNotificationStore` - for tests and local runs
//! - `PostgresNotificationStore` - PostgreSQL-backed for production

mod in_memory;
mod postgres;

pub use in_memory::InMemoryNotificationStore;
pub use postgres::PostgresNotificationStore;
