//! Read-through cache layer.
//!
//! Callers wrap their fetch explicitly:
//!
//! ```ignore
//! let key = CacheKey::new("course", "get").arg(&course_id).build()?;
//! let course = cache
//!     .read_through(&key, cache.default_ttl_secs(), || repo.find(&course_id))
//!     .await?;
//! ```
//!
//! The layer fails open. An unhealthy, slow or erroring backend turns every
//! read into a direct fetch and every invalidation into a logged no-op.
//! Errors from the fetch itself are the caller's and propagate unchanged.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;
use crate::ports::{CacheBackend, CacheError};

use super::key::entity_pattern;

/// Read-through wrapper with TTL expiry and pattern invalidation.
pub struct CacheLayer {
    backend: Arc<dyn CacheBackend>,
    enabled: bool,
    default_ttl_secs: u64,
    operation_timeout: Duration,
}

impl CacheLayer {
    pub fn new(backend: Arc<dyn CacheBackend>, config: &CacheConfig) -> Self {
        Self {
            backend,
            enabled: config.enabled,
            default_ttl_secs: config.default_ttl_secs,
            operation_timeout: config.operation_timeout(),
        }
    }

    pub fn default_ttl_secs(&self) -> u64 {
        self.default_ttl_secs
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// A hit is served only while the entry is at most `ttl_secs` old. A
    /// value that fails to decode counts as a miss and is overwritten.
    pub async fn read_through<T, E, F, Fut>(&self, key: &str, ttl_secs: u64, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.enabled {
            return fetch().await;
        }

        if !self.is_backend_healthy().await {
            tracing::warn!(cache_key = key, "Cache backend unavailable, reading through");
            return fetch().await;
        }

        match self.bounded(self.backend.get(key)).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    tracing::debug!(cache_key = key, "Cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(cache_key = key, error = %e, "Discarding undecodable cache entry");
                }
            },
            Ok(None) => tracing::debug!(cache_key = key, "Cache miss"),
            Err(e) => tracing::warn!(cache_key = key, error = %e, "Cache read failed, treating as miss"),
        }

        let value = fetch().await?;

        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                if let Err(e) = self.bounded(self.backend.set(key, bytes, ttl_secs)).await {
                    tracing::warn!(cache_key = key, error = %e, "Cache write failed");
                }
            }
            Err(e) => {
                tracing::warn!(cache_key = key, error = %e, "Value not cacheable, skipping write");
            }
        }

        Ok(value)
    }

    /// Remove every entry whose key matches `pattern`. Returns how many went.
    ///
    /// Backend failure is logged and reported as zero removals.
    pub async fn invalidate(&self, pattern: &str) -> u64 {
        match self.bounded(self.backend.delete_matching(pattern)).await {
            Ok(removed) => {
                tracing::debug!(pattern, removed, "Cache invalidated");
                removed
            }
            Err(e) => {
                tracing::warn!(pattern, error = %e, "Cache invalidation failed");
                0
            }
        }
    }

    /// Invalidate all keys of an entity (`entity:*`) or of one id (`entity:*:id`).
    pub async fn invalidate_entity(&self, entity: &str, id: Option<&str>) -> u64 {
        self.invalidate(&entity_pattern(entity, id)).await
    }

    async fn is_backend_healthy(&self) -> bool {
        tokio::time::timeout(self.operation_timeout, self.backend.is_healthy())
            .await
            .unwrap_or(false)
    }

    async fn bounded<R>(
        &self,
        operation: impl Future<Output = Result<R, CacheError>>,
    ) -> Result<R, CacheError> {
        match tokio::time::timeout(self.operation_timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(
                self.operation_timeout.as_millis() as u64,
            )),
        }
    }
}
