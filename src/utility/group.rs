//! Utility group orchestration.
//!
//! A utility group is a handle to the real set of utilities running inside
//! one cluster. It is built once per reconciliation invocation from the
//! cluster record and shared clients, and walks its utilities strictly in
//! the fixed dependency order for both provisioning and destruction.
//!
//! Each utility's actual version is persisted immediately after that
//! utility reconciles, not batched at the end, so a later failure leaves
//! everything already applied correctly recorded. The first error aborts
//! the remaining sequence; nothing is rolled back. Reconciliation state is
//! derived from the cluster record on every call, which keeps the whole
//! operation re-entrant after a crash.

use crate::chart::{ChartClient, CHART_REPOS};
use crate::cloud::CloudClient;
use crate::core::config::UtilitiesConfig;
use crate::core::error::{Error, Result};
use crate::model::cluster::Cluster;
use crate::store::ClusterStore;
use crate::utility::{
    Fluentbit, Nginx, Prometheus, Teleport, Utility, FLUENTBIT_CANONICAL_NAME,
    NGINX_CANONICAL_NAME, PROMETHEUS_CANONICAL_NAME, TELEPORT_CANONICAL_NAME,
};
use std::sync::Arc;
use tracing::info;

/// Handle to the group of utilities on one cluster.
pub struct UtilityGroup {
    utilities: Vec<Box<dyn Utility>>,
    cluster_id: String,
    chart: Arc<dyn ChartClient>,
    store: Arc<dyn ClusterStore>,
}

/// Resolve the version to reconcile a utility to: the cluster's desired
/// entry when present, otherwise the configured default.
fn resolve_desired_version(
    cluster: &Cluster,
    defaults: &UtilitiesConfig,
    utility: &str,
) -> Result<String> {
    let version = cluster
        .desired_utility_version(utility)
        .or_else(|| defaults.default_version(utility))
        .unwrap_or_default();
    if version.is_empty() {
        return Err(Error::UnresolvedDesiredVersion {
            utility: utility.to_string(),
        });
    }
    Ok(version.to_string())
}

impl UtilityGroup {
    /// Build the group for a cluster.
    ///
    /// Fails fast if any individual utility handle cannot be built; a
    /// partial group is never returned. The construction order here is the
    /// reconciliation order and resolves implicit runtime dependencies
    /// between the utilities; it must not be reordered.
    pub fn new(
        cluster: &Cluster,
        defaults: &UtilitiesConfig,
        cloud: Arc<dyn CloudClient>,
        chart: Arc<dyn ChartClient>,
        store: Arc<dyn ClusterStore>,
    ) -> Result<Self> {
        let nginx = Nginx::new(
            cluster.id.clone(),
            resolve_desired_version(cluster, defaults, NGINX_CANONICAL_NAME)?,
            Arc::clone(&cloud),
            Arc::clone(&chart),
        )
        .map_err(|e| Error::utility(NGINX_CANONICAL_NAME, e))?;

        let prometheus = Prometheus::new(
            cluster.id.clone(),
            resolve_desired_version(cluster, defaults, PROMETHEUS_CANONICAL_NAME)?,
            Arc::clone(&cloud),
            Arc::clone(&chart),
        )
        .map_err(|e| Error::utility(PROMETHEUS_CANONICAL_NAME, e))?;

        let fluentbit = Fluentbit::new(
            cluster.id.clone(),
            resolve_desired_version(cluster, defaults, FLUENTBIT_CANONICAL_NAME)?,
            Arc::clone(&chart),
        )
        .map_err(|e| Error::utility(FLUENTBIT_CANONICAL_NAME, e))?;

        let teleport = Teleport::new(
            cluster.id.clone(),
            resolve_desired_version(cluster, defaults, TELEPORT_CANONICAL_NAME)?,
            Arc::clone(&chart),
        )
        .map_err(|e| Error::utility(TELEPORT_CANONICAL_NAME, e))?;

        Ok(Self {
            utilities: vec![
                Box::new(nginx),
                Box::new(prometheus),
                Box::new(fluentbit),
                Box::new(teleport),
            ],
            cluster_id: cluster.id.clone(),
            chart,
            store,
        })
    }

    /// Reconcile every utility to its desired state.
    ///
    /// Ensures the chart runtime and repository registrations exist first,
    /// then walks the utilities in order: create-or-upgrade, then persist
    /// the observed actual version before moving on. Initial bring-up is
    /// the same operation; idempotence makes a separate create path
    /// unnecessary.
    pub fn provision(&mut self) -> Result<()> {
        self.chart
            .ensure_runtime_installed()
            .map_err(|e| Error::prerequisite("chart runtime", e))?;

        info!(cluster = %self.cluster_id, "registering chart repositories");
        for (name, url) in CHART_REPOS {
            self.chart
                .add_repository(name, url)
                .map_err(|e| Error::prerequisite(format!("chart repository {}", name), e))?;
        }

        for utility in &mut self.utilities {
            utility
                .create_or_upgrade()
                .map_err(|e| Error::utility(utility.name(), e))?;

            self.store.set_utility_actual_version(
                &self.cluster_id,
                utility.name(),
                utility.actual_version(),
            )?;
        }

        Ok(())
    }

    /// Tear down every utility in the group.
    ///
    /// Walks the same forward order as provisioning (deliberately not
    /// reversed), persisting each utility's post-destroy version as it
    /// goes. Fail-fast with no rollback, like provisioning.
    pub fn destroy(&mut self) -> Result<()> {
        for utility in &mut self.utilities {
            utility
                .destroy()
                .map_err(|e| Error::utility(utility.name(), e))?;

            self.store.set_utility_actual_version(
                &self.cluster_id,
                utility.name(),
                utility.actual_version(),
            )?;
        }

        Ok(())
    }

    /// Canonical names of the group's utilities, in reconciliation order.
    pub fn utility_names(&self) -> Vec<&'static str> {
        self.utilities.iter().map(|u| u.name()).collect()
    }
}
