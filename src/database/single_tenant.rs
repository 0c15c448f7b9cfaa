//! Cloud-managed single-tenant database backend.
//!
//! One dedicated RDS instance per installation, in MySQL and PostgreSQL
//! flavors. Instance lifecycle is delegated to the cloud client, which is
//! expected to be idempotent at its own boundary; this backend contributes
//! the contract semantics: honoring `keep_data` via a final snapshot and
//! supporting on-demand backups.

use crate::cloud::CloudClient;
use crate::core::error::Result;
use crate::database::{Database, DatabaseSecret, DatabaseSpec};
use crate::model::installation::DatabaseEngine;
use crate::store::InstallationDatabaseStore;
use std::sync::Arc;
use tracing::info;

/// Database backed by a dedicated cloud-managed instance.
pub struct SingleTenantRdsDatabase {
    installation_id: String,
    engine: DatabaseEngine,
    cloud: Arc<dyn CloudClient>,
}

impl SingleTenantRdsDatabase {
    /// Create the backend for one installation.
    pub fn new(
        installation_id: impl Into<String>,
        engine: DatabaseEngine,
        cloud: Arc<dyn CloudClient>,
    ) -> Self {
        Self {
            installation_id: installation_id.into(),
            engine,
            cloud,
        }
    }
}

impl Database for SingleTenantRdsDatabase {
    fn provision(&self, _store: &dyn InstallationDatabaseStore) -> Result<()> {
        info!(
            installation = %self.installation_id,
            engine = %self.engine,
            "ensuring single-tenant database instance"
        );
        self.cloud
            .ensure_single_tenant_database(&self.installation_id, self.engine)
    }

    fn teardown(&self, _store: &dyn InstallationDatabaseStore, keep_data: bool) -> Result<()> {
        if keep_data {
            info!(
                installation = %self.installation_id,
                "tearing down single-tenant database with final snapshot"
            );
        } else {
            info!(
                installation = %self.installation_id,
                "tearing down single-tenant database"
            );
        }
        self.cloud
            .teardown_single_tenant_database(&self.installation_id, keep_data)
    }

    fn snapshot(&self, _store: &dyn InstallationDatabaseStore) -> Result<()> {
        info!(installation = %self.installation_id, "creating database snapshot");
        self.cloud.create_database_snapshot(&self.installation_id)
    }

    fn generate_spec_and_secret(
        &self,
        _store: &dyn InstallationDatabaseStore,
    ) -> Result<Option<(DatabaseSpec, DatabaseSecret)>> {
        let credentials = self.cloud.get_database_credentials(&self.installation_id)?;
        let spec = DatabaseSpec {
            secret_name: credentials.secret_name.clone(),
        };
        let secret = DatabaseSecret {
            name: credentials.secret_name,
            data: credentials.data,
        };
        Ok(Some((spec, secret)))
    }
}
