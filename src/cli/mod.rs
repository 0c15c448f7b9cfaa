//! Command-line interface.
//!
//! Operator-facing CLI for Gantry configuration and database checks.

pub mod commands;

use clap::{Parser, Subcommand};

/// Gantry - multi-tenant cluster provisioning control plane.
#[derive(Parser, Debug)]
#[command(name = "gantry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration operations.
    Config(commands::ConfigArgs),
    /// Database backend operations.
    Database(commands::DatabaseArgs),
}
