//! Cloud resource client boundary.
//!
//! The core never manages cloud resources directly; it invokes this
//! collaborator and reacts to typed results. Implementations wrap the
//! provider SDK; tests substitute recording stubs.

use crate::core::error::Result;
use crate::model::installation::DatabaseEngine;
use std::collections::BTreeMap;

/// A certificate discovered by tag lookup.
#[derive(Debug, Clone)]
pub struct CertificateSummary {
    /// Provider ARN of the certificate.
    pub arn: String,

    /// Primary domain name on the certificate, when reported.
    pub domain_name: Option<String>,
}

/// VPC resources claimed for one cluster.
#[derive(Debug, Clone, Default)]
pub struct ClusterResources {
    /// Claimed VPC identifier.
    pub vpc_id: String,

    /// Private subnets available to the cluster.
    pub private_subnet_ids: Vec<String>,

    /// Public subnets available to the cluster.
    pub public_subnet_ids: Vec<String>,
}

/// Credential material for binding a workload to its database.
#[derive(Debug, Clone)]
pub struct DatabaseCredentials {
    /// Name of the secret the workload scheduler mounts.
    pub secret_name: String,

    /// Secret payload, keyed by field name.
    pub data: BTreeMap<String, String>,
}

/// Cloud provider operations consumed by the core.
pub trait CloudClient: Send + Sync {
    /// Look up a certificate by resource tag.
    fn get_certificate_summary_by_tag(&self, key: &str, value: &str)
        -> Result<CertificateSummary>;

    /// Claim VPC resources for a cluster, tagging them with the owner.
    fn get_and_claim_vpc_resources(
        &self,
        cluster_id: &str,
        owner: &str,
    ) -> Result<ClusterResources>;

    /// Release a cluster's claimed VPC resources.
    fn release_vpc(&self, cluster_id: &str) -> Result<()>;

    /// The private hosted zone's domain name.
    fn get_private_zone_domain_name(&self) -> Result<String>;

    /// Create a CNAME record in the private hosted zone.
    fn create_private_cname(&self, dns_name: &str, endpoints: &[String]) -> Result<()>;

    /// Create a CNAME record in the public hosted zone.
    fn create_public_cname(&self, dns_name: &str, endpoints: &[String]) -> Result<()>;

    /// Check whether a private CNAME record already exists.
    fn is_provisioned_private_cname(&self, dns_name: &str) -> bool;

    /// Delete a CNAME record from the private hosted zone.
    fn delete_private_cname(&self, dns_name: &str) -> Result<()>;

    /// Delete a CNAME record from the public hosted zone.
    fn delete_public_cname(&self, dns_name: &str) -> Result<()>;

    /// Add a tag to a cloud resource.
    fn tag_resource(&self, resource_id: &str, key: &str, value: &str) -> Result<()>;

    /// Remove a tag from a cloud resource.
    fn untag_resource(&self, resource_id: &str, key: &str, value: &str) -> Result<()>;

    /// Validate that a machine image exists and is usable.
    fn is_valid_ami(&self, ami_image: &str) -> Result<bool>;

    /// Claim an available multitenant database instance for the engine,
    /// returning its identifier and the VPC it lives in.
    fn claim_multitenant_database(&self, engine: DatabaseEngine) -> Result<(String, String)>;

    /// Ensure the logical database for an installation exists on a
    /// multitenant instance. Idempotent.
    fn ensure_logical_database(&self, database_id: &str, installation_id: &str) -> Result<()>;

    /// Drop an installation's logical database from a multitenant instance.
    fn drop_logical_database(&self, database_id: &str, installation_id: &str) -> Result<()>;

    /// Ensure a single-tenant database instance exists for an installation.
    /// Idempotent.
    fn ensure_single_tenant_database(
        &self,
        installation_id: &str,
        engine: DatabaseEngine,
    ) -> Result<()>;

    /// Tear down an installation's single-tenant database instance,
    /// optionally taking a final snapshot to preserve its data.
    fn teardown_single_tenant_database(&self, installation_id: &str, keep_data: bool)
        -> Result<()>;

    /// Trigger a backup of an installation's database.
    fn create_database_snapshot(&self, installation_id: &str) -> Result<()>;

    /// Fetch the credential material for an installation's database.
    fn get_database_credentials(&self, installation_id: &str) -> Result<DatabaseCredentials>;
}
