//! Teleport access proxy utility.
//!
//! Deploys last in the utility order: operator access rides on the ingress
//! and observability stack already being live. Teleport registers the
//! cluster with the fleet-wide proxy under the cluster's own identifier.

use crate::chart::{ChartClient, ReleaseSpec};
use crate::core::error::{Error, Result};
use crate::utility::{Utility, TELEPORT_CANONICAL_NAME};
use std::sync::Arc;
use tracing::info;

const CHART: &str = "chartmuseum/teleport";
const NAMESPACE: &str = "teleport";

/// Handle to the Teleport access proxy on one cluster.
pub struct Teleport {
    cluster_id: String,
    desired_version: String,
    actual_version: String,
    chart: Arc<dyn ChartClient>,
}

impl Teleport {
    /// Create a handle from the resolved desired version.
    pub fn new(
        cluster_id: impl Into<String>,
        desired_version: String,
        chart: Arc<dyn ChartClient>,
    ) -> Result<Self> {
        if desired_version.is_empty() {
            return Err(Error::UnresolvedDesiredVersion {
                utility: TELEPORT_CANONICAL_NAME.to_string(),
            });
        }
        Ok(Self {
            cluster_id: cluster_id.into(),
            desired_version,
            actual_version: String::new(),
            chart,
        })
    }
}

impl Utility for Teleport {
    fn create_or_upgrade(&mut self) -> Result<()> {
        info!(
            cluster = %self.cluster_id,
            version = %self.desired_version,
            "deploying teleport"
        );

        let release = ReleaseSpec::new(
            TELEPORT_CANONICAL_NAME,
            CHART,
            NAMESPACE,
            self.desired_version.clone(),
        )
        .with_value("config.auth_service.cluster_name", self.cluster_id.clone());

        self.chart.upgrade_release(&release)?;
        self.actual_version = self.desired_version.clone();
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        // The release deletion deregisters the cluster from the proxy; any
        // draining of live sessions is handled by the chart's pre-delete
        // hooks, not by the control plane.
        info!(cluster = %self.cluster_id, "removing teleport");
        self.chart
            .delete_release(TELEPORT_CANONICAL_NAME, NAMESPACE)?;
        self.actual_version.clear();
        Ok(())
    }

    fn actual_version(&self) -> &str {
        &self.actual_version
    }

    fn desired_version(&self) -> &str {
        &self.desired_version
    }

    fn name(&self) -> &'static str {
        TELEPORT_CANONICAL_NAME
    }
}
