//! Cache layer configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Read-through cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// When false every read goes straight to the fetch function.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// TTL used by callers that do not pick their own, in whole seconds
    #[serde(default = "default_ttl")]
    pub default_ttl_secs: u64,

    /// Upper bound for a single backend call, in milliseconds
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
}

impl CacheConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_ttl_secs == 0 {
            return Err(ValidationError::InvalidCacheTtl);
        }
        if self.operation_timeout_ms == 0 || self.operation_timeout_ms > 10_000 {
            return Err(ValidationError::InvalidCacheTimeout);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            default_ttl_secs: default_ttl(),
            operation_timeout_ms: default_operation_timeout(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_ttl() -> u64 {
    300
}

fn default_operation_timeout() -> u64 {
    250
}
