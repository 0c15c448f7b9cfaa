//! Fluent Bit log shipping utility.

use crate::chart::{ChartClient, ReleaseSpec};
use crate::core::error::{Error, Result};
use crate::utility::{Utility, FLUENTBIT_CANONICAL_NAME};
use std::sync::Arc;
use tracing::info;

const CHART: &str = "stable/fluent-bit";
const NAMESPACE: &str = "fluent-bit";

/// Handle to the Fluent Bit deployment on one cluster.
pub struct Fluentbit {
    cluster_id: String,
    desired_version: String,
    actual_version: String,
    chart: Arc<dyn ChartClient>,
}

impl Fluentbit {
    /// Create a handle from the resolved desired version.
    pub fn new(
        cluster_id: impl Into<String>,
        desired_version: String,
        chart: Arc<dyn ChartClient>,
    ) -> Result<Self> {
        if desired_version.is_empty() {
            return Err(Error::UnresolvedDesiredVersion {
                utility: FLUENTBIT_CANONICAL_NAME.to_string(),
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

impl Utility for Fluentbit {
    fn create_or_upgrade(&mut self) -> Result<()> {
        info!(
            cluster = %self.cluster_id,
            version = %self.desired_version,
            "deploying fluent-bit"
        );

        let release = ReleaseSpec::new(
            FLUENTBIT_CANONICAL_NAME,
            CHART,
            NAMESPACE,
            self.desired_version.clone(),
        )
        .with_value("filter.kubeTag", self.cluster_id.clone());

        self.chart.upgrade_release(&release)?;
        self.actual_version = self.desired_version.clone();
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        info!(cluster = %self.cluster_id, "removing fluent-bit");
        self.chart
            .delete_release(FLUENTBIT_CANONICAL_NAME, NAMESPACE)?;
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
        FLUENTBIT_CANONICAL_NAME
    }
}
