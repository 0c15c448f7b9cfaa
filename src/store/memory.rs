//! In-process store implementation.
//!
//! Backs the persistence contracts with `parking_lot`-guarded maps. All
//! mutations take the write lock for the full read-modify-write, so the
//! advisory lock fields themselves are updated atomically with respect to
//! other store callers.

use crate::core::error::{Error, Result};
use crate::model::cluster::Cluster;
use crate::model::installation::{ClusterInstallation, Installation};
use crate::model::multitenant::{
    ClusterInstallationFilter, MultitenantDatabase, MultitenantDatabaseFilter,
};
use crate::store::{ClusterStore, InstallationDatabaseStore};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Default)]
struct Inner {
    clusters: HashMap<String, Cluster>,
    installations: HashMap<String, Installation>,
    cluster_installations: Vec<ClusterInstallation>,
    // BTreeMap keeps query results in a stable order.
    multitenant_databases: BTreeMap<String, MultitenantDatabase>,
}

/// In-memory store for clusters, installations, and multitenant databases.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cluster record.
    pub fn put_cluster(&self, cluster: Cluster) {
        self.inner.write().clusters.insert(cluster.id.clone(), cluster);
    }

    /// Insert or replace an installation record.
    pub fn put_installation(&self, installation: Installation) {
        self.inner
            .write()
            .installations
            .insert(installation.id.clone(), installation);
    }

    /// Fetch one installation record by identifier.
    pub fn get_installation(&self, id: &str) -> Option<Installation> {
        self.inner.read().installations.get(id).cloned()
    }

    /// Record an installation's workload placement on a cluster.
    pub fn put_cluster_installation(&self, record: ClusterInstallation) {
        let mut inner = self.inner.write();
        inner
            .cluster_installations
            .retain(|ci| ci.id != record.id);
        inner.cluster_installations.push(record);
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

impl InstallationDatabaseStore for MemoryStore {
    fn get_multitenant_database(&self, id: &str) -> Result<Option<MultitenantDatabase>> {
        Ok(self.inner.read().multitenant_databases.get(id).cloned())
    }

    fn get_multitenant_databases(
        &self,
        filter: &MultitenantDatabaseFilter,
    ) -> Result<Vec<MultitenantDatabase>> {
        let inner = self.inner.read();
        let mut matches: Vec<MultitenantDatabase> = inner
            .multitenant_databases
            .values()
            .filter(|db| filter.matches(db))
            .cloned()
            .collect();
        if let Some(per_page) = filter.per_page {
            matches.truncate(per_page);
        }
        Ok(matches)
    }

    fn get_multitenant_database_for_installation(
        &self,
        installation_id: &str,
    ) -> Result<Option<MultitenantDatabase>> {
        let inner = self.inner.read();
        let mut assigned = inner
            .multitenant_databases
            .values()
            .filter(|db| db.contains_installation(installation_id));

        let first = assigned.next().cloned();
        if first.is_some() && assigned.next().is_some() {
            // The occupancy invariant is broken; surface it instead of
            // silently picking one.
            return Err(Error::store(format!(
                "installation {} occupies more than one multitenant database",
                installation_id
            )));
        }
        Ok(first)
    }

    fn create_multitenant_database(&self, database: &MultitenantDatabase) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.multitenant_databases.contains_key(&database.id) {
            return Err(Error::store(format!(
                "multitenant database {} already exists",
                database.id
            )));
        }
        inner
            .multitenant_databases
            .insert(database.id.clone(), database.clone());
        Ok(())
    }

    fn update_multitenant_database(&self, database: &MultitenantDatabase) -> Result<()> {
        let mut inner = self.inner.write();
        match inner.multitenant_databases.get_mut(&database.id) {
            Some(existing) => {
                // The lock fields are owned by lock/unlock; an update must
                // not clobber a lock taken by someone else.
                let lock = existing.lock.clone();
                *existing = database.clone();
                existing.lock = lock;
                Ok(())
            }
            None => Err(Error::MultitenantDatabaseNotFound {
                id: database.id.clone(),
            }),
        }
    }

    fn lock_multitenant_database(&self, id: &str, locker_id: &str) -> Result<bool> {
        let mut inner = self.inner.write();
        let database =
            inner
                .multitenant_databases
                .get_mut(id)
                .ok_or_else(|| Error::MultitenantDatabaseNotFound {
                    id: id.to_string(),
                })?;
        Ok(database.lock.try_acquire(locker_id, Self::now_ms()))
    }

    fn unlock_multitenant_database(&self, id: &str, locker_id: &str, force: bool) -> Result<bool> {
        let mut inner = self.inner.write();
        let database =
            inner
                .multitenant_databases
                .get_mut(id)
                .ok_or_else(|| Error::MultitenantDatabaseNotFound {
                    id: id.to_string(),
                })?;
        Ok(database.lock.release(locker_id, force))
    }

    fn get_cluster_installations(
        &self,
        filter: &ClusterInstallationFilter,
    ) -> Result<Vec<ClusterInstallation>> {
        let inner = self.inner.read();
        let mut matches: Vec<ClusterInstallation> = inner
            .cluster_installations
            .iter()
            .filter(|ci| {
                filter
                    .cluster_id
                    .as_ref()
                    .map_or(true, |id| &ci.cluster_id == id)
                    && filter
                        .installation_id
                        .as_ref()
                        .map_or(true, |id| &ci.installation_id == id)
            })
            .cloned()
            .collect();
        if let Some(per_page) = filter.per_page {
            matches.truncate(per_page);
        }
        Ok(matches)
    }
}

impl ClusterStore for MemoryStore {
    fn get_cluster(&self, id: &str) -> Result<Option<Cluster>> {
        Ok(self.inner.read().clusters.get(id).cloned())
    }

    fn set_utility_actual_version(
        &self,
        cluster_id: &str,
        utility: &str,
        version: &str,
    ) -> Result<()> {
        let mut inner = self.inner.write();
        let cluster = inner
            .clusters
            .get_mut(cluster_id)
            .ok_or_else(|| Error::store(format!("cluster {} not found", cluster_id)))?;
        cluster.set_utility_actual_version(utility, version);
        Ok(())
    }
}
