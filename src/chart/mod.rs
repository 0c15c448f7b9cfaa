//! Chart/package installer boundary.
//!
//! Utilities are deployed as chart releases. The core depends on a small
//! installer contract: make sure the package runtime itself is available,
//! register the fixed repository table, and install-or-upgrade / delete
//! individual releases.

use crate::core::error::Result;
use std::collections::BTreeMap;

/// Chart repositories registered before any utility deployment.
///
/// Process-wide immutable table; there is no runtime mutation.
pub const CHART_REPOS: &[(&str, &str)] = &[
    ("stable", "https://charts.helm.sh/stable"),
    ("chartmuseum", "https://chartmuseum.internal.gantry.dev"),
    ("ingress-nginx", "https://kubernetes.github.io/ingress-nginx"),
];

/// One chart release to install or upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSpec {
    /// Release name, unique per namespace.
    pub name: String,

    /// Chart reference in `repo/chart` form.
    pub chart: String,

    /// Target namespace.
    pub namespace: String,

    /// Chart version to apply.
    pub version: String,

    /// Value overrides passed to the chart.
    pub values: BTreeMap<String, String>,
}

impl ReleaseSpec {
    /// Create a release spec with no value overrides.
    pub fn new(
        name: impl Into<String>,
        chart: impl Into<String>,
        namespace: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            chart: chart.into(),
            namespace: namespace.into(),
            version: version.into(),
            values: BTreeMap::new(),
        }
    }

    /// Add a value override.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

/// Chart installer operations consumed by the core.
pub trait ChartClient: Send + Sync {
    /// Ensure the package manager runtime itself is installed and usable.
    fn ensure_runtime_installed(&self) -> Result<()>;

    /// Register a chart repository by name and source URL. Idempotent.
    fn add_repository(&self, name: &str, url: &str) -> Result<()>;

    /// Install the release if absent, upgrade it in place if present.
    fn upgrade_release(&self, release: &ReleaseSpec) -> Result<()>;

    /// Delete a release from its namespace.
    fn delete_release(&self, name: &str, namespace: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_spec_builder() {
        let release = ReleaseSpec::new("nginx", "ingress-nginx/ingress-nginx", "nginx", "2.15.0")
            .with_value("controller.replicaCount", "2");
        assert_eq!(release.values.get("controller.replicaCount").unwrap(), "2");
        assert_eq!(release.version, "2.15.0");
    }

    #[test]
    fn repo_table_is_fixed() {
        assert_eq!(CHART_REPOS.len(), 3);
        assert!(CHART_REPOS.iter().any(|(name, _)| *name == "ingress-nginx"));
    }
}
