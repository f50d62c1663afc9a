//! Event bus configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct EventBusConfig {
    /// Per-kind listener count above which a leak warning is logged.
    /// Registration still succeeds past it.
    #[serde(default = "default_max_listeners")]
    pub max_listeners: usize,
}

impl EventBusConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_listeners == 0 {
            return Err(ValidationError::InvalidListenerLimit);
        }
        Ok(())
    }
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            max_listeners: default_max_listeners(),
        }
    }
}

fn default_max_listeners() -> usize {
    100
}
