//! Persistence contracts consumed by the reconciliation core.
//!
//! The core is a caller of these traits, not an implementation detail of
//! any particular storage engine. [`memory::MemoryStore`] provides the
//! in-process reference implementation used by the CLI and the test suite.
//!
//! The multitenant mutation protocol every caller must follow: acquire the
//! record's lock, re-read its current state, perform the occupancy or
//! capacity change, persist the update, then release the lock. A crashed
//! holder is recoverable only via a forced unlock. Skipping the lock is a
//! correctness bug, not a style choice.

pub mod memory;

use crate::core::error::Result;
use crate::model::cluster::Cluster;
use crate::model::installation::ClusterInstallation;
use crate::model::multitenant::{
    ClusterInstallationFilter, MultitenantDatabase, MultitenantDatabaseFilter,
};

pub use memory::MemoryStore;

/// Store surface required to correlate an installation to a cluster and to
/// manage shared multitenant database capacity.
pub trait InstallationDatabaseStore: Send + Sync {
    /// Fetch one multitenant database record by identifier.
    fn get_multitenant_database(&self, id: &str) -> Result<Option<MultitenantDatabase>>;

    /// Query multitenant database records by filter.
    fn get_multitenant_databases(
        &self,
        filter: &MultitenantDatabaseFilter,
    ) -> Result<Vec<MultitenantDatabase>>;

    /// Fetch the multitenant database an installation is assigned to, if
    /// any. An installation is assigned to at most one.
    fn get_multitenant_database_for_installation(
        &self,
        installation_id: &str,
    ) -> Result<Option<MultitenantDatabase>>;

    /// Create a new multitenant database record.
    fn create_multitenant_database(&self, database: &MultitenantDatabase) -> Result<()>;

    /// Persist an updated multitenant database record.
    fn update_multitenant_database(&self, database: &MultitenantDatabase) -> Result<()>;

    /// Acquire the advisory lock on a multitenant database.
    ///
    /// Returns `Ok(false)` when the lock is already held; that is
    /// contention, not a fault.
    fn lock_multitenant_database(&self, id: &str, locker_id: &str) -> Result<bool>;

    /// Release the advisory lock on a multitenant database.
    ///
    /// Succeeds for the current holder, or unconditionally when `force` is
    /// set.
    fn unlock_multitenant_database(&self, id: &str, locker_id: &str, force: bool) -> Result<bool>;

    /// Query cluster-installation records by filter, used to discover where
    /// an installation's workload runs before mutating shared state.
    fn get_cluster_installations(
        &self,
        filter: &ClusterInstallationFilter,
    ) -> Result<Vec<ClusterInstallation>>;
}

/// Store surface for persisting cluster utility state.
///
/// Actual versions are written as discrete, independently persisted field
/// updates, one per utility, trading whole-reconciliation atomicity for
/// fine-grained crash recovery.
pub trait ClusterStore: Send + Sync {
    /// Fetch one cluster record by identifier.
    fn get_cluster(&self, id: &str) -> Result<Option<Cluster>>;

    /// Persist the actual version observed for one utility on a cluster.
    ///
    /// An empty version clears the entry, reflecting post-destroy state.
    fn set_utility_actual_version(
        &self,
        cluster_id: &str,
        utility: &str,
        version: &str,
    ) -> Result<()>;
}
