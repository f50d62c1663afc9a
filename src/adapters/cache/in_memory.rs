//! In-memory cache backend.
//!
//! Used in tests and as the fallback when Redis cannot be reached at
//! startup. Expiry is checked lazily on read; nothing sweeps in the
//! background.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;

use crate::ports::{CacheBackend, CacheError};

use super::pattern::glob_match;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    /// Expired strictly after the deadline, never at it.
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Process-local cache backend.
///
/// Clock reads go through `tokio::time`, so tests with paused time can
/// step over TTL boundaries deterministically.
#[derive(Debug)]
pub struct InMemoryCacheBackend {
    entries: RwLock<HashMap<String, Entry>>,
    available: AtomicBool,
}

impl InMemoryCacheBackend {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the backend going down or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_available(&self) -> Result<(), CacheError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::Unavailable("in-memory backend disabled".to_string()))
        }
    }
}

impl Default for InMemoryCacheBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.ensure_available()?;
        let now = Instant::now();

        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it so the map does not grow with dead keys.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<(), CacheError> {
        self.ensure_available()?;
        let entry = Entry {
            value,
            expires_at: Instant::now() + Duration::from_secs(ttl_secs),
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> Result<u64, CacheError> {
        self.ensure_available()?;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|key, _| !glob_match(pattern, key));
        Ok((before - entries.len()) as u64)
    }

    async fn is_healthy(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let backend = InMemoryCacheBackend::new();
        backend.set("course:get:c-1", b"{}".to_vec(), 60).await.unwrap();

        assert_eq!(
            backend.get("course:get:c-1").await.unwrap(),
            Some(b"{}".to_vec())
        );
        assert_eq!(backend.get("course:get:c-2").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entry_lives_through_ttl_and_expires_strictly_after() {
        let backend = InMemoryCacheBackend::new();
        backend.set("k", b"v".to_vec(), 10).await.unwrap();

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(backend.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(backend.get("k").await.unwrap().is_none());
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn delete_matching_removes_only_matching_keys() {
        let backend = InMemoryCacheBackend::new();
        backend.set("course:get:c-1", vec![1], 60).await.unwrap();
        backend.set("course:list:t-1", vec![2], 60).await.unwrap();
        backend.set("lesson:get:l-1", vec![3], 60).await.unwrap();

        let removed = backend.delete_matching("course:*").await.unwrap();

        assert_eq!(removed, 2);
        assert!(backend.get("lesson:get:l-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unavailable_backend_errors_and_reports_unhealthy() {
        let backend = InMemoryCacheBackend::new();
        backend.set_available(false);

        assert!(!backend.is_healthy().await);
        assert!(matches!(
            backend.get("k").await,
            Err(CacheError::Unavailable(_))
        ));
        assert!(backend.set("k", vec![], 1).await.is_err());
        assert!(backend.delete_matching("*").await.is_err());

        backend.set_available(true);
        assert!(backend.is_healthy().await);
    }
}
