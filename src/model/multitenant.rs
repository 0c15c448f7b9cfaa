//! Multitenant database records.
//!
//! One multitenant database is a shared hosting instance carrying schemas
//! for several installations. Many installations reference one database
//! (many-to-one); an installation references at most one database at a
//! time. The occupant set must only be mutated while the record's advisory
//! lock is held by the mutating actor.

use crate::model::installation::DatabaseEngine;
use crate::model::lock::LockState;
use serde::{Deserialize, Serialize};

/// A shared multitenant database instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultitenantDatabase {
    /// Cloud instance identifier, unique across the fleet.
    pub id: String,

    /// VPC the instance lives in.
    pub vpc_id: String,

    /// Database engine flavor.
    pub engine: DatabaseEngine,

    /// Installations currently assigned to this instance, in assignment
    /// order, duplicate-free.
    #[serde(default)]
    pub installation_ids: Vec<String>,

    /// Advisory lock state.
    #[serde(default)]
    pub lock: LockState,
}

impl MultitenantDatabase {
    /// Create a new, empty multitenant database record.
    pub fn new(id: impl Into<String>, vpc_id: impl Into<String>, engine: DatabaseEngine) -> Self {
        Self {
            id: id.into(),
            vpc_id: vpc_id.into(),
            engine,
            installation_ids: Vec::new(),
            lock: LockState::default(),
        }
    }

    /// Number of installations currently assigned.
    pub fn occupancy(&self) -> usize {
        self.installation_ids.len()
    }

    /// Check if an installation is assigned to this database.
    pub fn contains_installation(&self, installation_id: &str) -> bool {
        self.installation_ids.iter().any(|id| id == installation_id)
    }

    /// Assign an installation to this database.
    ///
    /// Returns `false` if the installation was already assigned (the set is
    /// duplicate-free).
    pub fn add_installation(&mut self, installation_id: impl Into<String>) -> bool {
        let installation_id = installation_id.into();
        if self.contains_installation(&installation_id) {
            return false;
        }
        self.installation_ids.push(installation_id);
        true
    }

    /// Remove an installation from this database.
    ///
    /// Returns `false` if the installation was not assigned.
    pub fn remove_installation(&mut self, installation_id: &str) -> bool {
        let before = self.installation_ids.len();
        self.installation_ids.retain(|id| id != installation_id);
        self.installation_ids.len() != before
    }

    /// Check if the database can take another installation under the given
    /// capacity limit.
    pub fn has_capacity(&self, max_installations: usize) -> bool {
        self.occupancy() < max_installations
    }
}

/// Selection filter for multitenant database queries.
#[derive(Debug, Clone, Default)]
pub struct MultitenantDatabaseFilter {
    /// Only databases of this engine.
    pub engine: Option<DatabaseEngine>,

    /// Only databases with occupancy strictly below this limit.
    pub max_occupancy: Option<usize>,

    /// Only databases in this VPC.
    pub vpc_id: Option<String>,

    /// Maximum number of records to return. `None` returns all.
    pub per_page: Option<usize>,
}

impl MultitenantDatabaseFilter {
    /// Check if a database record matches this filter, ignoring paging.
    pub fn matches(&self, database: &MultitenantDatabase) -> bool {
        if let Some(engine) = self.engine {
            if database.engine != engine {
                return false;
            }
        }
        if let Some(max) = self.max_occupancy {
            if database.occupancy() >= max {
                return false;
            }
        }
        if let Some(ref vpc_id) = self.vpc_id {
            if &database.vpc_id != vpc_id {
                return false;
            }
        }
        true
    }
}

/// Selection filter for cluster-installation queries.
#[derive(Debug, Clone, Default)]
pub struct ClusterInstallationFilter {
    /// Only records on this cluster.
    pub cluster_id: Option<String>,

    /// Only records for this installation.
    pub installation_id: Option<String>,

    /// Maximum number of records to return. `None` returns all.
    pub per_page: Option<usize>,
}
