//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Listen address is not host:port: {0}")]
    InvalidAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Wildcard CORS origin is not allowed in production")]
    WildcardOriginInProduction,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool needs max_connections >= 1 and >= min_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed ({0})")]
    PoolSizeTooLarge(u32),

    #[error("Pool acquire timeout must be between 100 and 60000 ms")]
    InvalidAcquireTimeout,

    #[error("Listener threshold must be at least 1")]
    InvalidListenerLimit,

    #[error("Cache TTL must be at least one second")]
    InvalidCacheTtl,

    #[error("Cache operation timeout must be between 1 and 10000 ms")]
    InvalidCacheTimeout,

    #[error("Cache key prefix must not contain glob characters")]
    InvalidKeyPrefix,
}
