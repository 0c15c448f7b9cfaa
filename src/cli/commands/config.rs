//! Config command implementation.

use crate::core::config::{Config, ConfigOverrides};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

/// Configuration operations.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate a configuration file.
    Validate {
        /// Config file path.
        #[arg(short, long, default_value = "config/gantry.toml")]
        config: PathBuf,
    },
    /// Print the effective configuration with defaults applied.
    Show {
        /// Config file path.
        #[arg(short, long, default_value = "config/gantry.toml")]
        config: PathBuf,
        /// Output format (toml, json).
        #[arg(long, default_value = "toml")]
        format: String,
    },
}

/// Run the config command.
pub fn run_config(args: ConfigArgs, overrides: &ConfigOverrides) -> Result<()> {
    match args.command {
        ConfigCommand::Validate { config } => validate_config(&config, overrides),
        ConfigCommand::Show { config, format } => show_config(&config, &format, overrides),
    }
}

/// Load the configuration with CLI overrides applied on top.
///
/// A missing file yields the built-in defaults; the result is validated
/// after the overrides are applied, so an invalid override is rejected the
/// same way an invalid file value is.
pub fn effective_config(path: &Path, overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = if path.exists() {
        Config::from_file(path)?
    } else {
        Config::default()
    };
    config.apply_overrides(overrides);
    config.validate()?;
    Ok(config)
}

fn validate_config(path: &Path, overrides: &ConfigOverrides) -> Result<()> {
    let mut config = Config::from_file(path)
        .with_context(|| format!("configuration invalid: {}", path.display()))?;
    config.apply_overrides(overrides);
    config.validate()?;

    println!("✓ configuration is valid");
    println!("  default database: {}", config.database.default_type);
    println!(
        "  multitenant capacity: {} installations per database",
        config.database.max_installations_per_multitenant_database
    );
    Ok(())
}

fn show_config(path: &Path, format: &str, overrides: &ConfigOverrides) -> Result<()> {
    let config = effective_config(path, overrides)?;

    match format {
        "toml" => {
            let rendered = toml::to_string_pretty(&config)?;
            println!("{}", rendered);
        }
        "json" => {
            let rendered = serde_json::to_string_pretty(&config)?;
            println!("{}", rendered);
        }
        other => anyhow::bail!("unknown output format: {}", other),
    }
    Ok(())
}
