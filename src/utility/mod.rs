//! Per-cluster infrastructure utilities.
//!
//! A utility is a service that runs once per cluster but belongs to no
//! tenant installation: the ingress controller, the metrics stack, log
//! shipping, and the access proxy. Each utility instance is constructed
//! fresh per reconciliation call from the cluster record and shared
//! clients, and discarded afterwards; only its resulting actual version
//! is persisted.

pub mod fluentbit;
pub mod group;
pub mod nginx;
pub mod prometheus;
pub mod teleport;

use crate::core::error::Result;

pub use fluentbit::Fluentbit;
pub use group::UtilityGroup;
pub use nginx::Nginx;
pub use prometheus::Prometheus;
pub use teleport::Teleport;

/// Canonical name of the NGINX ingress controller utility.
pub const NGINX_CANONICAL_NAME: &str = "nginx";
/// Canonical name of the Prometheus metrics utility.
pub const PROMETHEUS_CANONICAL_NAME: &str = "prometheus";
/// Canonical name of the Fluent Bit log shipping utility.
pub const FLUENTBIT_CANONICAL_NAME: &str = "fluentbit";
/// Canonical name of the Teleport access proxy utility.
pub const TELEPORT_CANONICAL_NAME: &str = "teleport";

/// The fixed dependency order utilities are reconciled in.
///
/// Later utilities may depend on earlier ones being live (everything behind
/// the ingress controller, the access proxy last). Destruction deliberately
/// walks the same forward order; both directions are a contract.
pub const UTILITY_ORDER: &[&str] = &[
    NGINX_CANONICAL_NAME,
    PROMETHEUS_CANONICAL_NAME,
    FLUENTBIT_CANONICAL_NAME,
    TELEPORT_CANONICAL_NAME,
];

/// One per-cluster infrastructure service.
pub trait Utility {
    /// Deploy the utility if absent, upgrade it in place if present.
    /// Safe to call repeatedly.
    fn create_or_upgrade(&mut self) -> Result<()>;

    /// Remove the utility from the cluster. Variants needing special
    /// teardown ordering encapsulate that internally.
    fn destroy(&mut self) -> Result<()>;

    /// The last version observed as successfully applied. Becomes stale if
    /// the cluster is mutated out-of-band; it is not auto-corrected.
    fn actual_version(&self) -> &str;

    /// The version requested, independent of whether it has been
    /// reconciled yet.
    fn desired_version(&self) -> &str;

    /// The canonical name used as the key into the cluster's version
    /// mapping.
    fn name(&self) -> &'static str;
}
