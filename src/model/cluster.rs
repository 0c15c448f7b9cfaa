//! Cluster records and utility version metadata.
//!
//! A cluster identifies one Kubernetes-style execution environment. The
//! record carries two maps keyed by canonical utility name: the desired
//! version (requested, may not yet be applied) and the actual version (last
//! observed applied version). The actual version is updated only after a
//! utility reconciles successfully, and becomes stale (but is not
//! auto-corrected) if the cluster is mutated out-of-band.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cluster state: creation has been requested.
pub const CLUSTER_STATE_CREATION_REQUESTED: &str = "creation-requested";
/// Cluster state: the cluster is provisioned and stable.
pub const CLUSTER_STATE_STABLE: &str = "stable";
/// Cluster state: deletion has been requested.
pub const CLUSTER_STATE_DELETION_REQUESTED: &str = "deletion-requested";

/// A cluster record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cluster {
    /// Unique cluster identifier.
    pub id: String,

    /// Cloud provider hosting the cluster.
    pub provider: String,

    /// Cluster size profile.
    pub size: String,

    /// Current lifecycle state.
    pub state: String,

    /// Per-utility desired and actual versions.
    #[serde(default)]
    pub utility_metadata: UtilityMetadata,
}

/// Desired and actual versions for the cluster's utilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityMetadata {
    /// Requested version per canonical utility name. Absence means the
    /// utility version was not explicitly requested for this cluster.
    #[serde(default)]
    pub desired_versions: BTreeMap<String, String>,

    /// Last successfully applied version per canonical utility name.
    #[serde(default)]
    pub actual_versions: BTreeMap<String, String>,
}

impl Cluster {
    /// Create a new cluster record with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: CLUSTER_STATE_CREATION_REQUESTED.to_string(),
            ..Self::default()
        }
    }

    /// The desired version requested for a utility, if any.
    pub fn desired_utility_version(&self, utility: &str) -> Option<&str> {
        self.utility_metadata
            .desired_versions
            .get(utility)
            .map(String::as_str)
    }

    /// The last version observed as successfully applied for a utility.
    pub fn actual_utility_version(&self, utility: &str) -> Option<&str> {
        self.utility_metadata
            .actual_versions
            .get(utility)
            .map(String::as_str)
    }

    /// Request a specific version for a utility.
    pub fn set_utility_desired_version(
        &mut self,
        utility: impl Into<String>,
        version: impl Into<String>,
    ) {
        self.utility_metadata
            .desired_versions
            .insert(utility.into(), version.into());
    }

    /// Record the version observed as applied for a utility.
    ///
    /// An empty version clears the entry, reflecting post-destroy state.
    pub fn set_utility_actual_version(&mut self, utility: &str, version: &str) {
        if version.is_empty() {
            self.utility_metadata.actual_versions.remove(utility);
        } else {
            self.utility_metadata
                .actual_versions
                .insert(utility.to_string(), version.to_string());
        }
    }
}
