//! Cache backend implementations.
//!
//! - `InMemoryCacheBackend` - process-local, for tests and degraded startup
//! - `RedisCacheBackend` - Redis-backed for production
//!
//! Both understand the same glob patterns for `delete_matching`.

mod in_memory;
mod pattern;
mod redis;

pub use in_memory::InMemoryCacheBackend;
pub use pattern::glob_match;
pub use redis::RedisCacheBackend;
