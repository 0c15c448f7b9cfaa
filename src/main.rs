//! Gantry - unified CLI entrypoint.
//!
//! Usage:
//!   gantry config validate --config config/gantry.toml
//!   gantry config show [--format toml|json]
//!   gantry database check <database-type>

use anyhow::Result;
use clap::Parser;
use gantry::cli::commands::{run_config, run_database};
use gantry::cli::{Cli, Commands};
use gantry::core::config::ConfigOverrides;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let overrides = ConfigOverrides {
        log_level: cli.log_level.clone(),
    };

    match cli.command {
        Commands::Config(args) => run_config(args, &overrides),
        Commands::Database(args) => run_database(args),
    }
}
