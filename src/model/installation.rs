//! Installation records and database backend selection.
//!
//! An installation is one tenant's deployed application workload. Each
//! installation selects exactly one database hosting strategy from a closed
//! set; the selection is immutable for the life of the current provisioning
//! cycle, and changing strategy requires a full teardown and re-provision.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Database hosted in the cluster by the in-cluster operator.
pub const DATABASE_MYSQL_OPERATOR: &str = "mysql-operator";
/// Single-tenant MySQL database hosted via cloud-managed RDS.
pub const DATABASE_SINGLE_TENANT_RDS_MYSQL: &str = "aws-rds";
/// Single-tenant PostgreSQL database hosted via cloud-managed RDS.
pub const DATABASE_SINGLE_TENANT_RDS_POSTGRES: &str = "aws-rds-postgres";
/// Multi-tenant MySQL database hosted via cloud-managed RDS.
pub const DATABASE_MULTITENANT_RDS_MYSQL: &str = "aws-multitenant-rds";
/// Multi-tenant PostgreSQL database hosted via cloud-managed RDS.
pub const DATABASE_MULTITENANT_RDS_POSTGRES: &str = "aws-multitenant-rds-postgres";

/// Installation state: creation has been requested.
pub const INSTALLATION_STATE_CREATION_REQUESTED: &str = "creation-requested";
/// Installation state: the installation is running and stable.
pub const INSTALLATION_STATE_STABLE: &str = "stable";
/// Installation state: deletion has been requested.
pub const INSTALLATION_STATE_DELETION_REQUESTED: &str = "deletion-requested";

/// The closed set of supported database hosting strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseType {
    /// Operator-hosted single-tenant database, materialized in-cluster.
    #[serde(rename = "mysql-operator")]
    MysqlOperator,
    /// Cloud-managed single-tenant MySQL.
    #[serde(rename = "aws-rds")]
    SingleTenantRdsMysql,
    /// Cloud-managed single-tenant PostgreSQL.
    #[serde(rename = "aws-rds-postgres")]
    SingleTenantRdsPostgres,
    /// Cloud-managed multi-tenant MySQL.
    #[serde(rename = "aws-multitenant-rds")]
    MultitenantRdsMysql,
    /// Cloud-managed multi-tenant PostgreSQL.
    #[serde(rename = "aws-multitenant-rds-postgres")]
    MultitenantRdsPostgres,
}

impl DatabaseType {
    /// Parse a database identifier against the supported enumeration.
    pub fn parse(database: &str) -> Result<Self> {
        match database {
            DATABASE_MYSQL_OPERATOR => Ok(Self::MysqlOperator),
            DATABASE_SINGLE_TENANT_RDS_MYSQL => Ok(Self::SingleTenantRdsMysql),
            DATABASE_SINGLE_TENANT_RDS_POSTGRES => Ok(Self::SingleTenantRdsPostgres),
            DATABASE_MULTITENANT_RDS_MYSQL => Ok(Self::MultitenantRdsMysql),
            DATABASE_MULTITENANT_RDS_POSTGRES => Ok(Self::MultitenantRdsPostgres),
            _ => Err(Error::UnsupportedDatabase {
                database: database.to_string(),
            }),
        }
    }

    /// The stable string identifier for this database type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MysqlOperator => DATABASE_MYSQL_OPERATOR,
            Self::SingleTenantRdsMysql => DATABASE_SINGLE_TENANT_RDS_MYSQL,
            Self::SingleTenantRdsPostgres => DATABASE_SINGLE_TENANT_RDS_POSTGRES,
            Self::MultitenantRdsMysql => DATABASE_MULTITENANT_RDS_MYSQL,
            Self::MultitenantRdsPostgres => DATABASE_MULTITENANT_RDS_POSTGRES,
        }
    }

    /// The database engine behind this hosting strategy.
    pub fn engine(&self) -> DatabaseEngine {
        match self {
            Self::MysqlOperator | Self::SingleTenantRdsMysql | Self::MultitenantRdsMysql => {
                DatabaseEngine::Mysql
            }
            Self::SingleTenantRdsPostgres | Self::MultitenantRdsPostgres => {
                DatabaseEngine::Postgres
            }
        }
    }

    /// Check if this strategy shares one database instance across tenants.
    pub fn is_multitenant(&self) -> bool {
        matches!(self, Self::MultitenantRdsMysql | Self::MultitenantRdsPostgres)
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database engine flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseEngine {
    /// MySQL.
    #[serde(rename = "mysql")]
    Mysql,
    /// PostgreSQL.
    #[serde(rename = "postgres")]
    Postgres,
}

impl DatabaseEngine {
    /// The stable string identifier for this engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check if a database identifier is in the supported enumeration.
///
/// Pure and side-effect free, so callers can reject invalid configuration
/// before attempting provisioning.
pub fn is_supported_database(database: &str) -> bool {
    DatabaseType::parse(database).is_ok()
}

/// An installation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installation {
    /// Unique installation identifier.
    pub id: String,

    /// Owning tenant identifier.
    pub owner_id: String,

    /// DNS name the workload is served under.
    pub dns: String,

    /// Workload size profile.
    pub size: String,

    /// Selected database hosting strategy.
    pub database: DatabaseType,

    /// Current lifecycle state.
    pub state: String,
}

impl Installation {
    /// Create a new installation record.
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        database: DatabaseType,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            dns: String::new(),
            size: String::new(),
            database,
            state: INSTALLATION_STATE_CREATION_REQUESTED.to_string(),
        }
    }

    /// Check if the installation's database is internal to the cluster the
    /// workload runs on.
    pub fn internal_database(&self) -> bool {
        self.database == DatabaseType::MysqlOperator
    }
}

/// A cluster-installation join record: one installation's workload placed
/// on one cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterInstallation {
    /// Unique record identifier.
    pub id: String,

    /// Cluster hosting the workload.
    pub cluster_id: String,

    /// Installation the workload belongs to.
    pub installation_id: String,

    /// Current lifecycle state.
    pub state: String,
}
