//! Operator-hosted database backend.
//!
//! The in-cluster operator materializes the database from the workload
//! spec at deploy time, so the control plane has nothing to pre-provision
//! and no connection information to hand out.

use crate::core::error::{Error, Result};
use crate::database::{Database, DatabaseSecret, DatabaseSpec};
use crate::store::InstallationDatabaseStore;
use tracing::{error, info, warn};

/// Database backed by the in-cluster MySQL operator.
#[derive(Debug, Default)]
pub struct OperatorDatabase;

impl OperatorDatabase {
    /// Create a new operator database backend.
    pub fn new() -> Self {
        Self
    }
}

impl Database for OperatorDatabase {
    fn provision(&self, _store: &dyn InstallationDatabaseStore) -> Result<()> {
        info!("operator database requires no pre-provisioning; skipping");
        Ok(())
    }

    fn teardown(&self, _store: &dyn InstallationDatabaseStore, keep_data: bool) -> Result<()> {
        info!("operator database requires no teardown; skipping");
        if keep_data {
            warn!("database preservation was requested, but is not possible with the operator");
        }
        Ok(())
    }

    fn snapshot(&self, _store: &dyn InstallationDatabaseStore) -> Result<()> {
        error!("snapshotting is not supported by the operator");
        Err(Error::not_implemented("operator database snapshot"))
    }

    fn generate_spec_and_secret(
        &self,
        _store: &dyn InstallationDatabaseStore,
    ) -> Result<Option<(DatabaseSpec, DatabaseSecret)>> {
        // Connection info is resolved in-cluster by the operator.
        Ok(None)
    }
}
