//! Configuration file loading
//!
//! The file is JSON. Every section is optional and falls back to defaults.
//! `ATLASDESK_PORT` and `ATLASDESK_LOG` override the file after parsing.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::http_server::HttpServerConfig;
use crate::models::is_email;
use crate::notify::MailConfig;
use crate::observability::LoggingConfig;
use crate::query::PageLimits;

use super::errors::{CliError, CliResult};

/// Overrides `server.port`
pub const PORT_ENV: &str = "ATLASDESK_PORT";

/// Overrides `logging.filter`
pub const LOG_ENV: &str = "ATLASDESK_LOG";

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub mail: MailConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub pagination: PageLimits,
}

impl Config {
    /// Load from file, apply environment overrides, then validate
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config(format!(
                "Failed to read config '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::parse(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> CliResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| CliError::config(format!("Invalid config JSON: {}", e)))
    }

    /// Apply overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port.trim().parse().map_err(|_| {
                CliError::config(format!("{} must be a port number, got '{}'", PORT_ENV, port))
            })?;
        }

        if let Some(filter) = lookup(LOG_ENV) {
            if !filter.trim().is_empty() {
                self.logging.filter = filter;
            }
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.server.port == 0 {
            return Err(CliError::config("server.port must be > 0"));
        }

        self.server
            .bind_addr()
            .map_err(|e| CliError::config(format!("server.host: {}", e)))?;

        if self.server.cors_origins.iter().any(|o| o.trim().is_empty()) {
            return Err(CliError::config(
                "server.cors_origins must not contain empty entries",
            ));
        }

        let limits = &self.pagination;
        if limits.max_limit == 0 {
            return Err(CliError::config("pagination.max_limit must be > 0"));
        }
        if limits.default_limit == 0 || limits.default_limit > limits.max_limit {
            return Err(CliError::config(format!(
                "pagination.default_limit must be between 1 and {}",
                limits.max_limit
            )));
        }

        self.logging
            .env_filter()
            .map_err(|e| CliError::config(e.to_string()))?;

        if !is_email(&self.mail.admin_email) {
            return Err(CliError::config(
                "mail.admin_email must be an email address",
            ));
        }

        if !self.mail.frontend_url.starts_with("http://")
            && !self.mail.frontend_url.starts_with("https://")
        {
            return Err(CliError::config(
                "mail.frontend_url must start with http:// or https://",
            ));
        }

        if let Some(smtp) = &self.mail.smtp {
            if smtp.host.trim().is_empty() {
                return Err(CliError::config("mail.smtp.host must not be empty"));
            }
            if smtp.port == 0 {
                return Err(CliError::config("mail.smtp.port must be > 0"));
            }
        }

        Ok(())
    }

    /// Copy safe to print: the SMTP password is masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(smtp) = config.mail.smtp.as_mut() {
            if !smtp.password.is_empty() {
                smtp.password = "********".to_string();
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SmtpConfig;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.pagination.default_limit, 10);
        assert_eq!(config.pagination.max_limit, 100);
        assert!(config.mail.smtp.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "server": {{"port": 8088, "cors_origins": ["https://app.example.com"]}},
                "logging": {{"filter": "debug", "json": false}},
                "pagination": {{"default_limit": 20, "max_limit": 50}}
            }}"#
        )
        .unwrap();

        let mut config = Config::parse(&fs::read_to_string(file.path()).unwrap()).unwrap();
        config.apply_overrides(no_env).unwrap();
        config.validate().unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.filter, "debug");
        assert!(!config.logging.json);
        assert_eq!(config.pagination.default_limit, 20);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.message().starts_with("Failed to read config"));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(err.message().starts_with("Invalid config JSON"));
    }

    #[test]
    fn test_unknown_section_is_ignored() {
        let config = Config::parse(r#"{"metrics": {"enabled": true}}"#).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(|key| match key {
                PORT_ENV => Some("9090".to_string()),
                LOG_ENV => Some("atlasdesk=debug".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.filter, "atlasdesk=debug");
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|key| (key == PORT_ENV).then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(err.message().contains(PORT_ENV));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.host = "localhost".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.pagination.default_limit = 200;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.pagination.max_limit = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.filter = "atlasdesk=loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.mail.admin_email = "nobody".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.mail.frontend_url = "app.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redacted_masks_password() {
        let mut config = Config::default();
        config.mail.smtp = Some(SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: "mailer".to_string(),
            password: "hunter2".to_string(),
        });

        let shown = config.redacted();
        assert_eq!(shown.mail.smtp.as_ref().unwrap().password, "********");
        assert_eq!(config.mail.smtp.as_ref().unwrap().password, "hunter2");
    }
}
