//! Rapport CLI
//!
//! Command-line interface for the Rapport CRM backend.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod config_handlers;

use anyhow::Result;
use clap::{Parser, Subcommand};

use rapport_core::RapportConfig;

/// Rapport - CRM backend
#[derive(Parser, Debug)]
#[command(name = "rapport")]
#[command(about = "Rapport CRM backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed the store and serve the REST API (the default)
    Serve,
    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: config_handlers::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rapport=debug".into()),
        )
        .init();

    let args = Args::parse();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = RapportConfig::load(args.config.as_deref())?;
            tracing::info!("Starting Rapport API on {}", config.server.bind);
            rapport_api::serve(config).await?;
        }
        Command::Config { action } => {
            config_handlers::handle_config_command(args.config.as_deref(), action)?;
        }
    }

    Ok(())
}
