//! NGINX ingress controller utility.
//!
//! Deploys first in the utility order: every other utility's traffic is
//! served through this ingress. The wildcard certificate for tenant
//! ingress is resolved by tag lookup before each deploy, so certificate
//! rotation is picked up on the next reconciliation.

use crate::chart::{ChartClient, ReleaseSpec};
use crate::cloud::CloudClient;
use crate::core::error::{Error, Result};
use crate::utility::{Utility, NGINX_CANONICAL_NAME};
use std::sync::Arc;
use tracing::info;

/// Tag key identifying ingress certificates.
const CERTIFICATE_TAG_KEY: &str = "gantry:certificate";
/// Tag value identifying the cluster ingress certificate.
const CERTIFICATE_TAG_VALUE: &str = "cluster-ingress";

const CHART: &str = "ingress-nginx/ingress-nginx";
const NAMESPACE: &str = "nginx";

/// Handle to the NGINX ingress controller on one cluster.
pub struct Nginx {
    cluster_id: String,
    desired_version: String,
    actual_version: String,
    cloud: Arc<dyn CloudClient>,
    chart: Arc<dyn ChartClient>,
}

impl Nginx {
    /// Create a handle from the resolved desired version.
    pub fn new(
        cluster_id: impl Into<String>,
        desired_version: String,
        cloud: Arc<dyn CloudClient>,
        chart: Arc<dyn ChartClient>,
    ) -> Result<Self> {
        if desired_version.is_empty() {
            return Err(Error::UnresolvedDesiredVersion {
                utility: NGINX_CANONICAL_NAME.to_string(),
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
}

impl Utility for Nginx {
    fn create_or_upgrade(&mut self) -> Result<()> {
        let certificate = self
            .cloud
            .get_certificate_summary_by_tag(CERTIFICATE_TAG_KEY, CERTIFICATE_TAG_VALUE)?;

        info!(
            cluster = %self.cluster_id,
            version = %self.desired_version,
            "deploying nginx ingress controller"
        );

        let release = ReleaseSpec::new(
            NGINX_CANONICAL_NAME,
            CHART,
            NAMESPACE,
            self.desired_version.clone(),
        )
        .with_value("controller.service.ssl-certificate-arn", certificate.arn);

        self.chart.upgrade_release(&release)?;
        self.actual_version = self.desired_version.clone();
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        info!(cluster = %self.cluster_id, "removing nginx ingress controller");
        self.chart.delete_release(NGINX_CANONICAL_NAME, NAMESPACE)?;
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
        NGINX_CANONICAL_NAME
    }
}
