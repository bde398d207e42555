//! # CLI
//!
//! Argument parsing and dispatch. Configuration comes from `CAMPDIR_*`
//! environment variables; the flags here override the server bind address
//! and point at an optional seed fixture.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::http::server;

#[derive(Debug, Parser)]
#[command(name = "campdir", version, about = "Bootcamp directory REST API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the API server
    Serve {
        /// Host to bind to (overrides CAMPDIR_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides CAMPDIR_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// JSON fixture file loaded into the store at startup
        #[arg(long)]
        seed: Option<PathBuf>,
    },
}

/// Parse arguments and run the selected command
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campdir=info,tower_http=info".into()),
        )
        .init();

    match cli.command {
        Command::Serve { host, port, seed } => {
            let mut config = AppConfig::from_env();
            if let Some(host) = host {
                config.http.host = host;
            }
            if let Some(port) = port {
                config.http.port = port;
            }

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config, seed.as_deref()))?;
            Ok(())
        }
    }
}
