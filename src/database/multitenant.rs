//! Cloud-managed multitenant database backend.
//!
//! Several installations share one database instance, so every occupancy
//! change follows the advisory lock protocol: acquire the record's lock,
//! re-read its state, mutate, persist, release. Contention surfaces as
//! [`Error::LockNotAcquired`] and the outer reconciliation loop retries;
//! a lock left behind by a crashed worker is cleared with a forced unlock.

use crate::cloud::CloudClient;
use crate::core::error::{Error, Result};
use crate::database::{Database, DatabaseSecret, DatabaseSpec};
use crate::model::installation::DatabaseEngine;
use crate::model::multitenant::{
    ClusterInstallationFilter, MultitenantDatabase, MultitenantDatabaseFilter,
};
use crate::store::InstallationDatabaseStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Database backed by a shared cloud-managed multitenant instance.
pub struct MultitenantRdsDatabase {
    installation_id: String,
    engine: DatabaseEngine,
    max_installations: usize,
    cloud: Arc<dyn CloudClient>,
}

/// Releases the store-level advisory lock when dropped.
///
/// Release is best-effort: a failure here leaves the lock behind for a
/// forced unlock, exactly like a crashed worker would.
struct StoreLockGuard<'a> {
    store: &'a dyn InstallationDatabaseStore,
    database_id: String,
    locker_id: String,
}

impl<'a> StoreLockGuard<'a> {
    fn new(
        store: &'a dyn InstallationDatabaseStore,
        database_id: impl Into<String>,
        locker_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            database_id: database_id.into(),
            locker_id: locker_id.into(),
        }
    }
}

impl Drop for StoreLockGuard<'_> {
    fn drop(&mut self) {
        match self
            .store
            .unlock_multitenant_database(&self.database_id, &self.locker_id, false)
        {
            Ok(true) => {}
            Ok(false) => warn!(
                database = %self.database_id,
                locker = %self.locker_id,
                "lock was not held at release time"
            ),
            Err(err) => warn!(
                database = %self.database_id,
                locker = %self.locker_id,
                error = %err,
                "failed to release multitenant database lock; forced unlock required"
            ),
        }
    }
}

impl MultitenantRdsDatabase {
    /// Create the backend for one installation.
    pub fn new(
        installation_id: impl Into<String>,
        engine: DatabaseEngine,
        max_installations: usize,
        cloud: Arc<dyn CloudClient>,
    ) -> Self {
        Self {
            installation_id: installation_id.into(),
            engine,
            max_installations,
            cloud,
        }
    }

    /// Confirm where the installation's workload actually runs before
    /// touching shared database state.
    fn find_workload_cluster(&self, store: &dyn InstallationDatabaseStore) -> Result<String> {
        let filter = ClusterInstallationFilter {
            installation_id: Some(self.installation_id.clone()),
            ..ClusterInstallationFilter::default()
        };
        let placements = store.get_cluster_installations(&filter)?;
        if placements.len() != 1 {
            return Err(Error::UnexpectedClusterInstallationCount {
                installation_id: self.installation_id.clone(),
                count: placements.len(),
            });
        }
        Ok(placements[0].cluster_id.clone())
    }

    /// Choose the multitenant database to assign the installation to:
    /// an existing record with spare capacity, or a freshly claimed
    /// instance when none qualifies.
    fn find_or_claim_database(&self, store: &dyn InstallationDatabaseStore) -> Result<String> {
        let filter = MultitenantDatabaseFilter {
            engine: Some(self.engine),
            max_occupancy: Some(self.max_installations),
            ..MultitenantDatabaseFilter::default()
        };
        let candidates = store.get_multitenant_databases(&filter)?;
        if let Some(candidate) = candidates.first() {
            debug!(
                database = %candidate.id,
                occupancy = candidate.occupancy(),
                "reusing multitenant database with spare capacity"
            );
            return Ok(candidate.id.clone());
        }

        let (database_id, vpc_id) = self.cloud.claim_multitenant_database(self.engine)?;
        info!(
            database = %database_id,
            engine = %self.engine,
            "claimed new multitenant database instance"
        );
        store.create_multitenant_database(&MultitenantDatabase::new(
            &database_id,
            vpc_id,
            self.engine,
        ))?;
        Ok(database_id)
    }
}

impl Database for MultitenantRdsDatabase {
    fn provision(&self, store: &dyn InstallationDatabaseStore) -> Result<()> {
        self.find_workload_cluster(store)?;

        // Re-provisioning reuses the existing assignment.
        let database_id = match store
            .get_multitenant_database_for_installation(&self.installation_id)?
        {
            Some(assigned) => assigned.id,
            None => self.find_or_claim_database(store)?,
        };

        if !store.lock_multitenant_database(&database_id, &self.installation_id)? {
            return Err(Error::LockNotAcquired {
                resource_id: database_id,
            });
        }
        let _guard = StoreLockGuard::new(store, &database_id, &self.installation_id);

        // Decisions below are made against the state re-read under the lock,
        // not the candidate snapshot used for selection.
        let mut database = store
            .get_multitenant_database(&database_id)?
            .ok_or_else(|| Error::MultitenantDatabaseNotFound {
                id: database_id.clone(),
            })?;

        if !database.contains_installation(&self.installation_id) {
            if !database.has_capacity(self.max_installations) {
                return Err(Error::DatabaseCapacityExhausted {
                    database_id: database.id,
                });
            }
            database.add_installation(&self.installation_id);
            store.update_multitenant_database(&database)?;
            info!(
                installation = %self.installation_id,
                database = %database.id,
                occupancy = database.occupancy(),
                "assigned installation to multitenant database"
            );
        }

        self.cloud
            .ensure_logical_database(&database.id, &self.installation_id)
    }

    fn teardown(&self, store: &dyn InstallationDatabaseStore, keep_data: bool) -> Result<()> {
        if keep_data {
            // The logical database shares its instance with other tenants;
            // there is nothing to detach and keep.
            return Err(Error::DataRetentionUnsupported {
                database: "multitenant".to_string(),
            });
        }

        let database = match store
            .get_multitenant_database_for_installation(&self.installation_id)?
        {
            Some(database) => database,
            None => {
                info!(
                    installation = %self.installation_id,
                    "installation holds no multitenant database capacity; skipping teardown"
                );
                return Ok(());
            }
        };

        if !store.lock_multitenant_database(&database.id, &self.installation_id)? {
            return Err(Error::LockNotAcquired {
                resource_id: database.id,
            });
        }
        let _guard = StoreLockGuard::new(store, &database.id, &self.installation_id);

        let mut database = store
            .get_multitenant_database(&database.id)?
            .ok_or_else(|| Error::MultitenantDatabaseNotFound {
                id: database.id.clone(),
            })?;

        self.cloud
            .drop_logical_database(&database.id, &self.installation_id)?;

        if database.remove_installation(&self.installation_id) {
            store.update_multitenant_database(&database)?;
            info!(
                installation = %self.installation_id,
                database = %database.id,
                occupancy = database.occupancy(),
                "released multitenant database capacity"
            );
        }

        Ok(())
    }

    fn snapshot(&self, _store: &dyn InstallationDatabaseStore) -> Result<()> {
        // A per-tenant snapshot of a shared instance is not expressible at
        // the cloud boundary.
        Err(Error::not_implemented("multitenant database snapshot"))
    }

    fn generate_spec_and_secret(
        &self,
        store: &dyn InstallationDatabaseStore,
    ) -> Result<Option<(DatabaseSpec, DatabaseSecret)>> {
        store
            .get_multitenant_database_for_installation(&self.installation_id)?
            .ok_or_else(|| Error::InstallationNotAssigned {
                installation_id: self.installation_id.clone(),
            })?;

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
