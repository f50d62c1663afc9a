//! HTTP/WebSocket listener configuration

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ValidationError;

/// Listener settings for `/ws`, `/health` and `/events`.
///
/// ```text
/// CAMPUS_NOTIFY__SERVER__LISTEN_ADDR=0.0.0.0:8080
/// CAMPUS_NOTIFY__SERVER__ALLOWED_ORIGINS=https://app.example.edu,https://admin.example.edu
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default)]
    pub environment: Environment,

    /// `tracing` filter directive; `RUST_LOG` wins when set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Upper bound for plain HTTP requests. Upgraded sockets are not affected.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Comma-separated browser origins, or `*` for any
    #[serde(default)]
    pub allowed_origins: String,
}

/// Application environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Which browser origins may open a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    /// No cross-origin access
    SameOrigin,
    Any,
    List(Vec<String>),
}

impl ServerConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr, ValidationError> {
        self.listen_addr
            .parse()
            .map_err(|_| ValidationError::InvalidAddress(self.listen_addr.clone()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn origin_policy(&self) -> OriginPolicy {
        let origins: Vec<String> = self
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        if origins.iter().any(|origin| origin == "*") {
            OriginPolicy::Any
        } else if origins.is_empty() {
            OriginPolicy::SameOrigin
        } else {
            OriginPolicy::List(origins)
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let addr = self.listen_addr()?;
        if addr.port() == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=300).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.is_production() && self.origin_policy() == OriginPolicy::Any {
            return Err(ValidationError::WildcardOriginInProduction);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            environment: Environment::default(),
            log_filter: default_log_filter(),
            request_timeout_secs: default_request_timeout(),
            allowed_origins: String::new(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_filter() -> String {
    "info,campus_notify=debug,sqlx=warn".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
