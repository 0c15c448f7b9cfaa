//! Database command implementation.

use crate::model::installation::DatabaseType;
use anyhow::Result;
use clap::{Args, Subcommand};

/// Database backend operations.
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    #[command(subcommand)]
    pub command: DatabaseCommand,
}

/// Database subcommands.
#[derive(Subcommand, Debug)]
pub enum DatabaseCommand {
    /// Check whether a database identifier is supported.
    Check {
        /// Database identifier to validate.
        database: String,
    },
}

/// Run the database command.
pub fn run_database(args: DatabaseArgs) -> Result<()> {
    match args.command {
        DatabaseCommand::Check { database } => check_database(&database),
    }
}

fn check_database(database: &str) -> Result<()> {
    match DatabaseType::parse(database) {
        Ok(parsed) => {
            println!("✓ {} is supported", database);
            println!("  engine: {}", parsed.engine());
            println!("  multitenant: {}", parsed.is_multitenant());
            Ok(())
        }
        Err(err) => anyhow::bail!(err),
    }
}
