//! CacheBackend port - byte-oriented key/value store with TTL.
//!
//! Backends are dumb storage: serialization, timeouts and fail-open policy
//! belong to the cache layer in front of them.

use async_trait::async_trait;

/// Errors that can occur in cache backend operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// Backend cannot be reached at all.
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    /// Backend did not answer within the configured bound.
    #[error("Cache operation timed out after {0}ms")]
    Timeout(u64),

    /// Backend answered with an error.
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// Value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Characters with special meaning in a `delete_matching` pattern.
const GLOB_SPECIAL: &[char] = &['*', '?', '[', ']', '\\'];

/// Escapes `literal` so it only ever matches itself inside a pattern.
pub fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if GLOB_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Port for cache storage.
///
/// Patterns use glob syntax: `*` matches any run of characters, `?`
/// matches exactly one and `\` makes the next character literal. Anything
/// taken from data must go through [`escape_glob`] first.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Read a value. Expired entries are reported as absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store a value that expires `ttl_secs` seconds after the write.
    async fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<(), CacheError>;

    /// Remove every key matching the pattern. Returns the number removed.
    async fn delete_matching(&self, pattern: &str) -> Result<u64, CacheError>;

    /// Whether the backend is currently usable.
    async fn is_healthy(&self) -> bool;
}
