//! Database backend tests.

mod common;

use common::{multitenant_database, place_workload, seed_database, StubCloudClient};
use gantry::core::error::Error;
use gantry::database::database_for;
use gantry::model::installation::{DatabaseEngine, DatabaseType};
use gantry::store::{InstallationDatabaseStore, MemoryStore};
use std::sync::Arc;

const MAX_INSTALLATIONS: usize = 3;

fn setup(database_type: DatabaseType) -> (MemoryStore, Arc<StubCloudClient>, Box<dyn gantry::Database>) {
    let store = MemoryStore::new();
    let cloud = Arc::new(StubCloudClient::new());
    let installation = place_workload(&store, "cluster-1", "inst-1", database_type);
    let backend = database_for(&installation, cloud.clone(), MAX_INSTALLATIONS);
    (store, cloud, backend)
}

// ============================================================================
// Operator-managed databases
// ============================================================================

#[test]
fn operator_database_lifecycle_is_cluster_local() {
    let (store, cloud, backend) = setup(DatabaseType::MysqlOperator);

    backend.provision(&store).unwrap();
    backend.teardown(&store, false).unwrap();
    // Data retention is accepted with a warning; the operator keeps data
    // inside the cluster regardless.
    backend.teardown(&store, true).unwrap();

    assert!(matches!(
        backend.snapshot(&store),
        Err(Error::NotImplemented { .. })
    ));
    assert!(backend.generate_spec_and_secret(&store).unwrap().is_none());

    // Nothing touches the cloud for operator-managed databases.
    assert_eq!(cloud.claim_count(), 0);
    assert!(cloud.single_tenant_ensures.lock().is_empty());
}

// ============================================================================
// Single-tenant databases
// ============================================================================

#[test]
fn single_tenant_provision_and_snapshot_delegate_to_cloud() {
    let (store, cloud, backend) = setup(DatabaseType::SingleTenantRdsPostgres);

    backend.provision(&store).unwrap();
    assert_eq!(*cloud.single_tenant_ensures.lock(), vec!["inst-1"]);

    backend.snapshot(&store).unwrap();
    assert_eq!(*cloud.snapshots.lock(), vec!["inst-1"]);
}

#[test]
fn single_tenant_teardown_honors_data_retention() {
    let (store, cloud, backend) = setup(DatabaseType::SingleTenantRdsMysql);

    backend.teardown(&store, true).unwrap();
    backend.teardown(&store, false).unwrap();
    assert_eq!(
        *cloud.single_tenant_teardowns.lock(),
        vec![("inst-1".to_string(), true), ("inst-1".to_string(), false)]
    );
}

#[test]
fn single_tenant_spec_and_secret_from_credentials() {
    let (store, _cloud, backend) = setup(DatabaseType::SingleTenantRdsPostgres);

    let (spec, secret) = backend
        .generate_spec_and_secret(&store)
        .unwrap()
        .expect("single-tenant databases carry credentials");
    assert_eq!(spec.secret_name, "inst-1-database");
    assert_eq!(secret.name, spec.secret_name);
    assert!(secret.data.contains_key("DB_CONNECTION_STRING"));
}

// ============================================================================
// Multitenant databases
// ============================================================================

#[test]
fn multitenant_provision_claims_instance_when_none_qualifies() {
    let (store, cloud, backend) = setup(DatabaseType::MultitenantRdsPostgres);

    backend.provision(&store).unwrap();

    assert_eq!(cloud.claim_count(), 1);
    let assigned = store
        .get_multitenant_database_for_installation("inst-1")
        .unwrap()
        .expect("installation assigned after provisioning");
    assert_eq!(assigned.id, "rds-claimed-1");
    assert_eq!(assigned.occupancy(), 1);
    assert_eq!(
        *cloud.logical_ensures.lock(),
        vec![("rds-claimed-1".to_string(), "inst-1".to_string())]
    );

    // The advisory lock was released after the mutation.
    assert!(store
        .lock_multitenant_database("rds-claimed-1", "other")
        .unwrap());
}

#[test]
fn multitenant_provision_reuses_spare_capacity() {
    let (store, cloud, backend) = setup(DatabaseType::MultitenantRdsPostgres);
    seed_database(
        &store,
        &multitenant_database("rds-1", DatabaseEngine::Postgres, &["other-1"]),
    );

    backend.provision(&store).unwrap();

    assert_eq!(cloud.claim_count(), 0);
    let database = store.get_multitenant_database("rds-1").unwrap().unwrap();
    assert_eq!(database.occupancy(), 2);
    assert!(database.contains_installation("inst-1"));
}

#[test]
fn multitenant_provision_skips_full_and_wrong_engine_instances() {
    let (store, cloud, backend) = setup(DatabaseType::MultitenantRdsPostgres);
    seed_database(
        &store,
        &multitenant_database("rds-full", DatabaseEngine::Postgres, &["a", "b", "c"]),
    );
    seed_database(
        &store,
        &multitenant_database("rds-mysql", DatabaseEngine::Mysql, &[]),
    );

    backend.provision(&store).unwrap();

    assert_eq!(cloud.claim_count(), 1);
    let assigned = store
        .get_multitenant_database_for_installation("inst-1")
        .unwrap()
        .unwrap();
    assert_eq!(assigned.id, "rds-claimed-1");
}

#[test]
fn multitenant_provision_is_idempotent() {
    let (store, cloud, backend) = setup(DatabaseType::MultitenantRdsPostgres);

    backend.provision(&store).unwrap();
    backend.provision(&store).unwrap();

    // The existing assignment is reused; no second instance is claimed and
    // no duplicate occupancy appears.
    assert_eq!(cloud.claim_count(), 1);
    let assigned = store
        .get_multitenant_database_for_installation("inst-1")
        .unwrap()
        .unwrap();
    assert_eq!(assigned.occupancy(), 1);
    assert_eq!(cloud.logical_ensures.lock().len(), 2);
}

#[test]
fn multitenant_provision_requires_single_workload_placement() {
    let store = MemoryStore::new();
    let cloud = Arc::new(StubCloudClient::new());
    let installation = gantry::model::Installation::new(
        "inst-unplaced",
        "owner-1",
        DatabaseType::MultitenantRdsMysql,
    );
    let backend = database_for(&installation, cloud, MAX_INSTALLATIONS);

    let err = backend.provision(&store).unwrap_err();
    assert!(matches!(
        err,
        Error::UnexpectedClusterInstallationCount { count: 0, .. }
    ));
}

#[test]
fn multitenant_provision_surfaces_lock_contention() {
    let (store, _cloud, backend) = setup(DatabaseType::MultitenantRdsPostgres);
    seed_database(
        &store,
        &multitenant_database("rds-1", DatabaseEngine::Postgres, &[]),
    );
    assert!(store.lock_multitenant_database("rds-1", "worker-elsewhere").unwrap());

    let err = backend.provision(&store).unwrap_err();
    assert!(matches!(err, Error::LockNotAcquired { .. }));
    assert!(err.is_retriable());

    // The foreign lock is intact and no capacity changed.
    let database = store.get_multitenant_database("rds-1").unwrap().unwrap();
    assert_eq!(database.lock.holder(), Some("worker-elsewhere"));
    assert_eq!(database.occupancy(), 0);
}

#[test]
fn forced_unlock_recovers_from_a_crashed_holder() {
    let (store, _cloud, backend) = setup(DatabaseType::MultitenantRdsPostgres);
    seed_database(
        &store,
        &multitenant_database("rds-1", DatabaseEngine::Postgres, &[]),
    );
    assert!(store.lock_multitenant_database("rds-1", "crashed-worker").unwrap());

    assert!(backend.provision(&store).is_err());

    assert!(store
        .unlock_multitenant_database("rds-1", "operator", true)
        .unwrap());
    backend.provision(&store).unwrap();

    let database = store.get_multitenant_database("rds-1").unwrap().unwrap();
    assert!(database.contains_installation("inst-1"));
}

#[test]
fn multitenant_teardown_releases_capacity() {
    let (store, cloud, backend) = setup(DatabaseType::MultitenantRdsPostgres);
    backend.provision(&store).unwrap();

    backend.teardown(&store, false).unwrap();

    assert_eq!(
        *cloud.logical_drops.lock(),
        vec![("rds-claimed-1".to_string(), "inst-1".to_string())]
    );
    assert!(store
        .get_multitenant_database_for_installation("inst-1")
        .unwrap()
        .is_none());
    let database = store
        .get_multitenant_database("rds-claimed-1")
        .unwrap()
        .unwrap();
    assert_eq!(database.occupancy(), 0);
    assert!(!database.lock.is_locked());
}

#[test]
fn multitenant_teardown_without_assignment_is_a_no_op() {
    let (store, cloud, backend) = setup(DatabaseType::MultitenantRdsMysql);

    backend.teardown(&store, false).unwrap();

    assert!(cloud.logical_drops.lock().is_empty());
}

#[test]
fn multitenant_teardown_rejects_data_retention() {
    let (store, cloud, backend) = setup(DatabaseType::MultitenantRdsPostgres);
    backend.provision(&store).unwrap();

    let err = backend.teardown(&store, true).unwrap_err();
    assert!(matches!(err, Error::DataRetentionUnsupported { .. }));

    // The assignment is untouched.
    assert!(store
        .get_multitenant_database_for_installation("inst-1")
        .unwrap()
        .is_some());
    assert!(cloud.logical_drops.lock().is_empty());
}

#[test]
fn multitenant_snapshot_is_not_supported() {
    let (store, _cloud, backend) = setup(DatabaseType::MultitenantRdsMysql);
    assert!(matches!(
        backend.snapshot(&store),
        Err(Error::NotImplemented { .. })
    ));
}

#[test]
fn multitenant_spec_requires_an_assignment() {
    let (store, _cloud, backend) = setup(DatabaseType::MultitenantRdsPostgres);

    let err = backend.generate_spec_and_secret(&store).unwrap_err();
    assert!(matches!(err, Error::InstallationNotAssigned { .. }));

    backend.provision(&store).unwrap();
    let (spec, secret) = backend.generate_spec_and_secret(&store).unwrap().unwrap();
    assert_eq!(spec.secret_name, "inst-1-database");
    assert_eq!(secret.name, spec.secret_name);
}

#[test]
fn installation_never_occupies_two_databases() {
    let (store, _cloud, backend) = setup(DatabaseType::MultitenantRdsPostgres);
    seed_database(
        &store,
        &multitenant_database("rds-a", DatabaseEngine::Postgres, &[]),
    );
    seed_database(
        &store,
        &multitenant_database("rds-b", DatabaseEngine::Postgres, &[]),
    );

    backend.provision(&store).unwrap();
    backend.provision(&store).unwrap();

    let occupied: Vec<String> = ["rds-a", "rds-b"]
        .iter()
        .filter_map(|id| store.get_multitenant_database(id).unwrap())
        .filter(|db| db.contains_installation("inst-1"))
        .map(|db| db.id)
        .collect();
    assert_eq!(occupied.len(), 1);
}
