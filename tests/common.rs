//! Common test utilities.
//!
//! This module contains shared helpers for integration tests.
//! Import with `mod common;` in test files.

#![allow(dead_code)]

use gantry::chart::{ChartClient, ReleaseSpec};
use gantry::cloud::{CertificateSummary, CloudClient, ClusterResources, DatabaseCredentials};
use gantry::core::error::{Error, Result};
use gantry::model::installation::{ClusterInstallation, DatabaseEngine, DatabaseType};
use gantry::model::{Cluster, Installation, MultitenantDatabase};
use gantry::store::{ClusterStore, InstallationDatabaseStore, MemoryStore};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};

/// One observed chart installer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartEvent {
    EnsureRuntime,
    AddRepo(String),
    Upgrade(String),
    Delete(String),
}

/// Chart client that records every call and can fail on demand.
#[derive(Default)]
pub struct RecordingChartClient {
    events: Mutex<Vec<ChartEvent>>,
    fail_upgrade_of: Mutex<Option<String>>,
    fail_delete_of: Mutex<Option<String>>,
}

impl RecordingChartClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `upgrade_release` fail for the named release.
    pub fn fail_upgrade_of(&self, release: &str) {
        *self.fail_upgrade_of.lock() = Some(release.to_string());
    }

    /// Make `delete_release` fail for the named release.
    pub fn fail_delete_of(&self, release: &str) {
        *self.fail_delete_of.lock() = Some(release.to_string());
    }

    /// All calls observed so far, in order.
    pub fn events(&self) -> Vec<ChartEvent> {
        self.events.lock().clone()
    }

    /// Release names passed to `upgrade_release`, in order.
    pub fn upgraded(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ChartEvent::Upgrade(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Release names passed to `delete_release`, in order.
    pub fn deleted(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ChartEvent::Delete(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Clear any injected failures.
    pub fn clear_failures(&self) {
        *self.fail_upgrade_of.lock() = None;
        *self.fail_delete_of.lock() = None;
    }
}

impl ChartClient for RecordingChartClient {
    fn ensure_runtime_installed(&self) -> Result<()> {
        self.events.lock().push(ChartEvent::EnsureRuntime);
        Ok(())
    }

    fn add_repository(&self, name: &str, _url: &str) -> Result<()> {
        self.events.lock().push(ChartEvent::AddRepo(name.to_string()));
        Ok(())
    }

    fn upgrade_release(&self, release: &ReleaseSpec) -> Result<()> {
        self.events
            .lock()
            .push(ChartEvent::Upgrade(release.name.clone()));
        if self.fail_upgrade_of.lock().as_deref() == Some(release.name.as_str()) {
            return Err(Error::chart(format!("upgrade of {} failed", release.name)));
        }
        Ok(())
    }

    fn delete_release(&self, name: &str, _namespace: &str) -> Result<()> {
        self.events.lock().push(ChartEvent::Delete(name.to_string()));
        if self.fail_delete_of.lock().as_deref() == Some(name) {
            return Err(Error::chart(format!("delete of {} failed", name)));
        }
        Ok(())
    }
}

/// Cloud client stub returning canned resources and recording mutations.
#[derive(Default)]
pub struct StubCloudClient {
    claimed: Mutex<usize>,
    private_cnames: Mutex<BTreeSet<String>>,
    pub cname_creates: Mutex<Vec<String>>,
    pub logical_ensures: Mutex<Vec<(String, String)>>,
    pub logical_drops: Mutex<Vec<(String, String)>>,
    pub single_tenant_ensures: Mutex<Vec<String>>,
    pub single_tenant_teardowns: Mutex<Vec<(String, bool)>>,
    pub snapshots: Mutex<Vec<String>>,
}

impl StubCloudClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of multitenant instances claimed so far.
    pub fn claim_count(&self) -> usize {
        *self.claimed.lock()
    }
}

impl CloudClient for StubCloudClient {
    fn get_certificate_summary_by_tag(
        &self,
        _key: &str,
        _value: &str,
    ) -> Result<CertificateSummary> {
        Ok(CertificateSummary {
            arn: "arn:aws:acm:us-east-1:000000000000:certificate/test".to_string(),
            domain_name: Some("*.test.example.com".to_string()),
        })
    }

    fn get_and_claim_vpc_resources(
        &self,
        _cluster_id: &str,
        _owner: &str,
    ) -> Result<ClusterResources> {
        Ok(ClusterResources {
            vpc_id: "vpc-1".to_string(),
            private_subnet_ids: vec!["subnet-priv-1".to_string()],
            public_subnet_ids: vec!["subnet-pub-1".to_string()],
        })
    }

    fn release_vpc(&self, _cluster_id: &str) -> Result<()> {
        Ok(())
    }

    fn get_private_zone_domain_name(&self) -> Result<String> {
        Ok("internal.test".to_string())
    }

    fn create_private_cname(&self, dns_name: &str, _endpoints: &[String]) -> Result<()> {
        self.private_cnames.lock().insert(dns_name.to_string());
        self.cname_creates.lock().push(dns_name.to_string());
        Ok(())
    }

    fn create_public_cname(&self, _dns_name: &str, _endpoints: &[String]) -> Result<()> {
        Ok(())
    }

    fn is_provisioned_private_cname(&self, dns_name: &str) -> bool {
        self.private_cnames.lock().contains(dns_name)
    }

    fn delete_private_cname(&self, dns_name: &str) -> Result<()> {
        self.private_cnames.lock().remove(dns_name);
        Ok(())
    }

    fn delete_public_cname(&self, _dns_name: &str) -> Result<()> {
        Ok(())
    }

    fn tag_resource(&self, _resource_id: &str, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn untag_resource(&self, _resource_id: &str, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn is_valid_ami(&self, _ami_image: &str) -> Result<bool> {
        Ok(true)
    }

    fn claim_multitenant_database(&self, _engine: DatabaseEngine) -> Result<(String, String)> {
        let mut claimed = self.claimed.lock();
        *claimed += 1;
        Ok((format!("rds-claimed-{}", *claimed), "vpc-1".to_string()))
    }

    fn ensure_logical_database(&self, database_id: &str, installation_id: &str) -> Result<()> {
        self.logical_ensures
            .lock()
            .push((database_id.to_string(), installation_id.to_string()));
        Ok(())
    }

    fn drop_logical_database(&self, database_id: &str, installation_id: &str) -> Result<()> {
        self.logical_drops
            .lock()
            .push((database_id.to_string(), installation_id.to_string()));
        Ok(())
    }

    fn ensure_single_tenant_database(
        &self,
        installation_id: &str,
        _engine: DatabaseEngine,
    ) -> Result<()> {
        self.single_tenant_ensures
            .lock()
            .push(installation_id.to_string());
        Ok(())
    }

    fn teardown_single_tenant_database(
        &self,
        installation_id: &str,
        keep_data: bool,
    ) -> Result<()> {
        self.single_tenant_teardowns
            .lock()
            .push((installation_id.to_string(), keep_data));
        Ok(())
    }

    fn create_database_snapshot(&self, installation_id: &str) -> Result<()> {
        self.snapshots.lock().push(installation_id.to_string());
        Ok(())
    }

    fn get_database_credentials(&self, installation_id: &str) -> Result<DatabaseCredentials> {
        let mut data = BTreeMap::new();
        data.insert(
            "DB_CONNECTION_STRING".to_string(),
            format!("postgres://{}@db.internal.test/db", installation_id),
        );
        Ok(DatabaseCredentials {
            secret_name: format!("{}-database", installation_id),
            data,
        })
    }
}

/// Cluster store that records every persisted actual-version write in
/// order, on top of a real in-memory store.
pub struct RecordingClusterStore {
    pub store: MemoryStore,
    persisted: Mutex<Vec<(String, String)>>,
}

impl RecordingClusterStore {
    pub fn with_cluster(cluster: Cluster) -> Self {
        let store = MemoryStore::new();
        store.put_cluster(cluster);
        Self {
            store,
            persisted: Mutex::new(Vec::new()),
        }
    }

    /// `(utility, version)` pairs in the order they were persisted.
    pub fn persisted(&self) -> Vec<(String, String)> {
        self.persisted.lock().clone()
    }

    pub fn clear_persisted(&self) {
        self.persisted.lock().clear();
    }
}

impl ClusterStore for RecordingClusterStore {
    fn get_cluster(&self, id: &str) -> Result<Option<Cluster>> {
        self.store.get_cluster(id)
    }

    fn set_utility_actual_version(
        &self,
        cluster_id: &str,
        utility: &str,
        version: &str,
    ) -> Result<()> {
        self.store
            .set_utility_actual_version(cluster_id, utility, version)?;
        self.persisted
            .lock()
            .push((utility.to_string(), version.to_string()));
        Ok(())
    }
}

/// Register an installation and its workload placement on a cluster.
pub fn place_workload(
    store: &MemoryStore,
    cluster_id: &str,
    installation_id: &str,
    database: DatabaseType,
) -> Installation {
    let installation = Installation::new(installation_id, "owner-1", database);
    store.put_cluster(Cluster::new(cluster_id));
    store.put_installation(installation.clone());
    store.put_cluster_installation(ClusterInstallation {
        id: format!("ci-{}", installation_id),
        cluster_id: cluster_id.to_string(),
        installation_id: installation_id.to_string(),
        state: "stable".to_string(),
    });
    installation
}

/// Create a multitenant database record with the given occupants.
pub fn multitenant_database(
    id: &str,
    engine: DatabaseEngine,
    occupants: &[&str],
) -> MultitenantDatabase {
    let mut database = MultitenantDatabase::new(id, "vpc-1", engine);
    for occupant in occupants {
        database.add_installation(*occupant);
    }
    database
}

/// Seed a store with one multitenant database record.
pub fn seed_database(store: &MemoryStore, database: &MultitenantDatabase) {
    store
        .create_multitenant_database(database)
        .expect("seeding multitenant database");
}
