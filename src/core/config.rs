//! Configuration parsing and validation.
//!
//! Gantry configuration is loaded from TOML files with CLI overrides.
//! The configuration carries the defaults the reconciliation core needs:
//! per-utility default versions, the default database backend for new
//! installations, and multitenant capacity limits.

use crate::model::installation::is_supported_database;
use crate::utility;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level Gantry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provisioner identity and behavior.
    #[serde(default)]
    pub provisioner: ProvisionerConfig,

    /// Default versions for per-cluster utilities.
    #[serde(default)]
    pub utilities: UtilitiesConfig,

    /// Database backend defaults and capacity limits.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Telemetry and observability configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Provisioner identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionerConfig {
    /// Owner tag recorded on claimed cloud resources.
    #[serde(default = "default_owner")]
    pub owner: String,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
        }
    }
}

/// Default versions for the fixed set of cluster utilities.
///
/// A cluster record's desired-version entry overrides these; the default is
/// used when the cluster has no entry for a utility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilitiesConfig {
    /// Default NGINX ingress controller chart version.
    #[serde(default = "default_nginx_version")]
    pub nginx: String,

    /// Default Prometheus chart version.
    #[serde(default = "default_prometheus_version")]
    pub prometheus: String,

    /// Default Fluent Bit chart version.
    #[serde(default = "default_fluentbit_version")]
    pub fluentbit: String,

    /// Default Teleport chart version.
    #[serde(default = "default_teleport_version")]
    pub teleport: String,
}

impl Default for UtilitiesConfig {
    fn default() -> Self {
        Self {
            nginx: default_nginx_version(),
            prometheus: default_prometheus_version(),
            fluentbit: default_fluentbit_version(),
            teleport: default_teleport_version(),
        }
    }
}

impl UtilitiesConfig {
    /// Look up the default version for a utility by canonical name.
    pub fn default_version(&self, utility: &str) -> Option<&str> {
        match utility {
            utility::NGINX_CANONICAL_NAME => Some(&self.nginx),
            utility::PROMETHEUS_CANONICAL_NAME => Some(&self.prometheus),
            utility::FLUENTBIT_CANONICAL_NAME => Some(&self.fluentbit),
            utility::TELEPORT_CANONICAL_NAME => Some(&self.teleport),
            _ => None,
        }
    }
}

/// Database backend defaults and multitenant capacity limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Default database backend for new installations.
    #[serde(default = "default_database_type")]
    pub default_type: String,

    /// Maximum installations assigned to one multitenant database.
    #[serde(default = "default_max_installations")]
    pub max_installations_per_multitenant_database: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            default_type: default_database_type(),
            max_installations_per_multitenant_database: default_max_installations(),
        }
    }
}

/// Telemetry and observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// Default value functions

fn default_owner() -> String {
    "gantry".to_string()
}

fn default_nginx_version() -> String {
    "2.15.0".to_string()
}

fn default_prometheus_version() -> String {
    "10.4.0".to_string()
}

fn default_fluentbit_version() -> String {
    "2.8.7".to_string()
}

fn default_teleport_version() -> String {
    "0.3.0".to_string()
}

fn default_database_type() -> String {
    "mysql-operator".to_string()
}

fn default_max_installations() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).with_context(|| "failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides to the configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref log_level) = overrides.log_level {
            self.telemetry.log_level = log_level.clone();
        }
    }

    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<()> {
        self.validate_utilities()?;
        self.validate_database()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_utilities(&self) -> Result<()> {
        for name in utility::UTILITY_ORDER {
            let version = self
                .utilities
                .default_version(name)
                .unwrap_or_default();
            if version.is_empty() {
                anyhow::bail!("utilities.{} default version must not be empty", name);
            }
        }
        Ok(())
    }

    fn validate_database(&self) -> Result<()> {
        if !is_supported_database(&self.database.default_type) {
            anyhow::bail!(
                "database.default_type is not a supported database: {}",
                self.database.default_type
            );
        }

        if self.database.max_installations_per_multitenant_database == 0 {
            anyhow::bail!("database.max_installations_per_multitenant_database must be > 0");
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "telemetry.log_level must be one of {:?}, got: {}",
                valid_levels,
                self.telemetry.log_level
            );
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provisioner: ProvisionerConfig::default(),
            utilities: UtilitiesConfig::default(),
            database: DatabaseConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// CLI override options that can be applied to configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override log level.
    pub log_level: Option<String>,
}
