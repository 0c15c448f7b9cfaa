//! Database backend abstraction.
//!
//! Each database hosting strategy implements the same contract: idempotent
//! provisioning, teardown with a best-effort data preservation hint,
//! snapshots, and generation of the deployable spec/secret pair the
//! workload scheduler binds to. Selection is table-driven from the closed
//! [`DatabaseType`] enumeration.

pub mod multitenant;
pub mod operator;
pub mod single_tenant;

use crate::cloud::CloudClient;
use crate::core::error::Result;
use crate::model::installation::{DatabaseType, Installation};
use crate::store::InstallationDatabaseStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub use multitenant::MultitenantRdsDatabase;
pub use operator::OperatorDatabase;
pub use single_tenant::SingleTenantRdsDatabase;

/// Deployable database configuration for the workload scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSpec {
    /// Name of the secret holding the connection credentials.
    pub secret_name: String,
}

/// Credential material accompanying a [`DatabaseSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSecret {
    /// Secret name, matching the spec's reference.
    pub name: String,

    /// Secret payload, keyed by field name.
    pub data: BTreeMap<String, String>,
}

/// One database hosting strategy.
pub trait Database: Send + Sync {
    /// Complete all steps necessary to provision the database.
    ///
    /// Idempotent: calling again on an already-provisioned installation
    /// must not create duplicate resources or fail merely because
    /// provisioning already happened.
    fn provision(&self, store: &dyn InstallationDatabaseStore) -> Result<()>;

    /// Release the database's resources.
    ///
    /// `keep_data` is a best-effort hint; backends that cannot honor it
    /// report that explicitly so callers can surface a warning instead of
    /// assuming the data was preserved.
    fn teardown(&self, store: &dyn InstallationDatabaseStore, keep_data: bool) -> Result<()>;

    /// Trigger a backup. Backends that cannot support this fail
    /// deterministically with a not-implemented error.
    fn snapshot(&self, store: &dyn InstallationDatabaseStore) -> Result<()>;

    /// Produce the spec/secret pair the workload scheduler needs.
    ///
    /// May legitimately return `None` for backends where connection
    /// information is resolved by another mechanism.
    fn generate_spec_and_secret(
        &self,
        store: &dyn InstallationDatabaseStore,
    ) -> Result<Option<(DatabaseSpec, DatabaseSecret)>>;
}

/// Select the database backend for an installation.
///
/// `max_installations` caps the occupancy of one multitenant database and
/// comes from configuration.
pub fn database_for(
    installation: &Installation,
    cloud: Arc<dyn CloudClient>,
    max_installations: usize,
) -> Box<dyn Database> {
    match installation.database {
        DatabaseType::MysqlOperator => Box::new(OperatorDatabase::new()),
        DatabaseType::SingleTenantRdsMysql | DatabaseType::SingleTenantRdsPostgres => {
            Box::new(SingleTenantRdsDatabase::new(
                installation.id.clone(),
                installation.database.engine(),
                cloud,
            ))
        }
        DatabaseType::MultitenantRdsMysql | DatabaseType::MultitenantRdsPostgres => {
            Box::new(MultitenantRdsDatabase::new(
                installation.id.clone(),
                installation.database.engine(),
                max_installations,
                cloud,
            ))
        }
    }
}
