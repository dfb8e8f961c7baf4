//! CLI module for AtlasDesk
//!
//! Provides command-line interface for:
//! - serve: Load configuration and run the HTTP server
//! - check-config: Validate a configuration file

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check_config, run, run_command, serve};
pub use config::{Config, LOG_ENV, PORT_ENV};
pub use errors::{CliError, CliResult};
