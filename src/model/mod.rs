//! Persistent record types: clusters, installations, multitenant databases,
//! and the advisory lock state they share.

pub mod cluster;
pub mod installation;
pub mod lock;
pub mod multitenant;

pub use cluster::{Cluster, UtilityMetadata};
pub use installation::{
    is_supported_database, ClusterInstallation, DatabaseEngine, DatabaseType, Installation,
};
pub use lock::LockState;
pub use multitenant::{ClusterInstallationFilter, MultitenantDatabase, MultitenantDatabaseFilter};
