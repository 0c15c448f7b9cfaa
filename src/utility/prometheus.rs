//! Prometheus metrics utility.
//!
//! Deploys the metrics stack and publishes a private CNAME for the scrape
//! endpoint so fleet-level collectors can reach each cluster by a stable
//! name. The CNAME is created only when missing, keeping repeated
//! reconciliation idempotent, and removed again on destroy.

use crate::chart::{ChartClient, ReleaseSpec};
use crate::cloud::CloudClient;
use crate::core::error::{Error, Result};
use crate::utility::{Utility, PROMETHEUS_CANONICAL_NAME};
use std::sync::Arc;
use tracing::info;

const CHART: &str = "stable/prometheus";
const NAMESPACE: &str = "prometheus";

/// Handle to the Prometheus stack on one cluster.
pub struct Prometheus {
    cluster_id: String,
    desired_version: String,
    actual_version: String,
    cloud: Arc<dyn CloudClient>,
    chart: Arc<dyn ChartClient>,
}

impl Prometheus {
    /// Create a handle from the resolved desired version.
    pub fn new(
        cluster_id: impl Into<String>,
        desired_version: String,
        cloud: Arc<dyn CloudClient>,
        chart: Arc<dyn ChartClient>,
    ) -> Result<Self> {
        if desired_version.is_empty() {
            return Err(Error::UnresolvedDesiredVersion {
                utility: PROMETHEUS_CANONICAL_NAME.to_string(),
            });
        }
        Ok(Self {
            cluster_id: cluster_id.into(),
            desired_version,
            actual_version: String::new(),
            cloud,
            chart,
        })
    }

    fn scrape_dns(&self, private_zone: &str) -> String {
        format!("{}.prometheus.{}", self.cluster_id, private_zone)
    }

    fn ingress_endpoint(&self, private_zone: &str) -> String {
        format!("ingress.{}.{}", self.cluster_id, private_zone)
    }
}

impl Utility for Prometheus {
    fn create_or_upgrade(&mut self) -> Result<()> {
        let private_zone = self.cloud.get_private_zone_domain_name()?;
        let dns = self.scrape_dns(&private_zone);

        info!(
            cluster = %self.cluster_id,
            version = %self.desired_version,
            host = %dns,
            "deploying prometheus"
        );

        let release = ReleaseSpec::new(
            PROMETHEUS_CANONICAL_NAME,
            CHART,
            NAMESPACE,
            self.desired_version.clone(),
        )
        .with_value("server.ingress.hosts", dns.clone());

        self.chart.upgrade_release(&release)?;

        if !self.cloud.is_provisioned_private_cname(&dns) {
            let endpoints = vec![self.ingress_endpoint(&private_zone)];
            self.cloud.create_private_cname(&dns, &endpoints)?;
        }

        self.actual_version = self.desired_version.clone();
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        let private_zone = self.cloud.get_private_zone_domain_name()?;
        let dns = self.scrape_dns(&private_zone);

        info!(cluster = %self.cluster_id, host = %dns, "removing prometheus");

        // Drop the scrape endpoint before the backing release so collectors
        // stop resolving a dead target.
        self.cloud.delete_private_cname(&dns)?;
        self.chart
            .delete_release(PROMETHEUS_CANONICAL_NAME, NAMESPACE)?;
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
        PROMETHEUS_CANONICAL_NAME
    }
}
