//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `CAMPUS_NOTIFY` prefix
//! and `__` between nested sections.
//!
//! # Example
//!
//! ```no_run
//! use campus_notify::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod cache;
mod database;
mod error;
mod events;
mod redis;
mod server;

pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use events::EventBusConfig;
pub use redis::RedisConfig;
pub use server::{Environment, OriginPolicy, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Listener address, environment, log filter and CORS origins
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection for notifications and enrollments
    pub database: DatabaseConfig,

    /// Optional Redis cache backend
    #[serde(default)]
    pub redis: RedisConfig,

    /// Event bus tuning
    #[serde(default)]
    pub events: EventBusConfig,

    /// Read-through cache tuning
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CAMPUS_NOTIFY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `CAMPUS_NOTIFY__SERVER__LISTEN_ADDR=0.0.0.0:8080` -> `server.listen_addr`
    /// - `CAMPUS_NOTIFY__CACHE__DEFAULT_TTL_SECS=60` -> `cache.default_ttl_secs = 60`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAMPUS_NOTIFY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.events.validate()?;
        self.cache.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
