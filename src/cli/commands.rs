//! CLI command implementations
//!
//! `serve` loads configuration, installs logging, wires services over the
//! in-memory store and blocks on the HTTP server until Ctrl-C.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::http_server::{AppState, HttpServer};
use crate::notify::create_email_sender;
use crate::observability::{init_logging, Event};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};

/// Parse arguments and dispatch
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::CheckConfig { config } => check_config(&config, &mut io::stdout().lock()),
    }
}

/// Start the HTTP server
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
        config.validate()?;
    }

    init_logging(&config.logging).map_err(|e| CliError::boot(e.to_string()))?;
    info!(
        event = Event::BootStart.as_str(),
        version = env!("CARGO_PKG_VERSION"),
    );
    info!(
        event = Event::ConfigLoaded.as_str(),
        path = %config_path.display(),
        port = config.server.port,
        smtp = config.mail.smtp.is_some(),
        default_limit = config.pagination.default_limit,
        max_limit = config.pagination.max_limit,
    );

    let mailer = create_email_sender(&config.mail)
        .map_err(|e| CliError::boot(format!("Failed to create email sender: {}", e)))?;
    let state = Arc::new(AppState::in_memory(mailer, config.pagination));
    let server = HttpServer::new(config.server, state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Validate a configuration file and print the effective settings
pub fn check_config<W: Write>(config_path: &Path, out: &mut W) -> CliResult<()> {
    let config = Config::load(config_path)?;
    serde_json::to_writer_pretty(&mut *out, &config.redacted())?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn test_check_config_prints_effective_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"mail": {{"smtp": {{"host": "smtp.example.com", "user": "u", "password": "secret"}}}}}}"#
        )
        .unwrap();

        let mut out = Vec::new();
        check_config(file.path(), &mut out).unwrap();

        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["mail"]["smtp"]["host"], "smtp.example.com");
        assert_eq!(printed["mail"]["smtp"]["port"], 587);
        assert_eq!(printed["mail"]["smtp"]["password"], "********");
        assert_eq!(printed["pagination"]["max_limit"], 100);
    }

    #[test]
    fn test_check_config_rejects_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"pagination": {{"default_limit": 0}}}}"#).unwrap();

        let mut out = Vec::new();
        let err = check_config(file.path(), &mut out).unwrap_err();
        assert!(err.to_string().starts_with("ATLAS_CLI_CONFIG_ERROR"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_serve_fails_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = serve(&dir.path().join("missing.json"), None).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
