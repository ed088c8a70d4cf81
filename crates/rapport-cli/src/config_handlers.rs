//! Handler functions for config CLI commands.

use anyhow::{bail, Result};
use clap::Subcommand;
use std::path::PathBuf;

use rapport_core::config::CONFIG_PATH_ENV;
use rapport_core::RapportConfig;

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Create a default configuration file
    Init {
        /// Target file (defaults to ./rapport.toml)
        #[arg(short, long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Dispatch a config subcommand.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Show => cmd_config_show(config_path),
        ConfigAction::Init { file, force } => cmd_config_init(file.as_deref(), force),
    }
}

/// Show the resolved config file path.
fn cmd_config_path(config_path: Option<&str>) -> Result<()> {
    let path = resolve_display_path(config_path);
    let exists = path.exists();
    println!("{}", path.display());
    if !exists {
        eprintln!("(file does not exist — run `rapport config init` to create it)");
    }
    Ok(())
}

/// Print the effective configuration (file + env overrides applied).
fn cmd_config_show(config_path: Option<&str>) -> Result<()> {
    let config = RapportConfig::load(config_path)?;
    println!("{}", config.to_toml()?);
    Ok(())
}

/// Create a default configuration file.
fn cmd_config_init(file: Option<&str>, force: bool) -> Result<()> {
    let path = file
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("rapport.toml"));

    if path.exists() && !force {
        bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let config = RapportConfig::default();
    std::fs::write(&path, config.to_toml()?)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn resolve_display_path(config_path: Option<&str>) -> PathBuf {
    if let Some(p) = config_path {
        return PathBuf::from(p);
    }
    if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(p);
    }
    PathBuf::from("rapport.toml")
}
