//! CLI argument definitions using clap
//!
//! Commands:
//! - atlasdesk serve --config <path> [--port <port>]
//! - atlasdesk check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AtlasDesk - users, clients, projects and contact requests over HTTP
#[derive(Parser, Debug)]
#[command(name = "atlasdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./atlasdesk.json")]
        config: PathBuf,

        /// Port to bind, overriding the configuration file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load and validate a configuration file, then print it
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./atlasdesk.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
