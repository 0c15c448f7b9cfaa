//! CLI command implementations.

mod config;
mod database;

pub use config::{effective_config, run_config, ConfigArgs, ConfigCommand};
pub use database::{run_database, DatabaseArgs, DatabaseCommand};
