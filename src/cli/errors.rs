//! # CLI Errors
//!
//! Anything that stops `serve` or `check-config`. `main` prints the error
//! as `CODE: message` and exits with status 1.

use std::io;

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Config file missing, unparsable or out of range
    #[error("ATLAS_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    /// Reading the file or writing output failed
    #[error("ATLAS_CLI_IO_ERROR: {0}")]
    Io(String),

    /// Logging, mail transport, runtime or listener setup failed
    #[error("ATLAS_CLI_BOOT_FAILED: {0}")]
    Boot(String),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    pub fn boot(msg: impl Into<String>) -> Self {
        CliError::Boot(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "ATLAS_CLI_CONFIG_ERROR",
            CliError::Io(_) => "ATLAS_CLI_IO_ERROR",
            CliError::Boot(_) => "ATLAS_CLI_BOOT_FAILED",
        }
    }

    /// Detail without the code prefix
    pub fn message(&self) -> &str {
        match self {
            CliError::Config(msg) | CliError::Io(msg) | CliError::Boot(msg) => msg,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(format!("JSON output failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_code() {
        let err = CliError::config("server.port must be > 0");
        assert_eq!(err.to_string(), "ATLAS_CLI_CONFIG_ERROR: server.port must be > 0");
        assert_eq!(err.code(), "ATLAS_CLI_CONFIG_ERROR");
        assert_eq!(err.message(), "server.port must be > 0");
    }

    #[test]
    fn test_io_error_converts() {
        let err: CliError = io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed").into();
        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(err.code(), "ATLAS_CLI_IO_ERROR");
    }
}
