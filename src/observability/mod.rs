//! # Observability
//!
//! Structured logging through `tracing`. Lines are JSON by default, one
//! event per line, each tagged with an [`Event`] name.

mod events;

pub use events::Event;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `atlasdesk=debug,tower_http=info`
    #[serde(default = "default_filter")]
    pub filter: String,

    /// JSON lines when true, human-readable otherwise
    #[serde(default = "default_json")]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: default_json(),
        }
    }
}

impl LoggingConfig {
    pub fn env_filter(&self) -> Result<EnvFilter, ObservabilityError> {
        EnvFilter::try_new(&self.filter)
            .map_err(|e| ObservabilityError::InvalidFilter(format!("{}: {}", self.filter, e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

impl ObservabilityError {
    pub fn code(&self) -> &'static str {
        match self {
            ObservabilityError::InvalidFilter(_) => "ATLAS_OBSERVABILITY_INVALID_FILTER",
            ObservabilityError::AlreadyInitialized(_) => "ATLAS_OBSERVABILITY_ALREADY_INITIALIZED",
        }
    }
}

/// Install the global subscriber
pub fn init_logging(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .with_target(false);

    let installed = if config.json {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ObservabilityError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.filter, "info");
        assert!(config.json);
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let config: LoggingConfig = serde_json::from_str(r#"{"json": false}"#).unwrap();
        assert_eq!(config.filter, "info");
        assert!(!config.json);
    }

    #[test]
    fn test_invalid_filter() {
        let config = LoggingConfig {
            filter: "atlasdesk=notalevel".to_string(),
            json: true,
        };
        assert!(matches!(
            config.env_filter(),
            Err(ObservabilityError::InvalidFilter(_))
        ));
    }
}
