//! Error types for provisioning and reconciliation.
//!
//! Gantry distinguishes four failure classes, because callers react to them
//! differently:
//!
//! - configuration errors are surfaced before any side effect and are never
//!   retried by the core;
//! - prerequisite errors name the prerequisite that failed;
//! - per-unit reconciliation errors name the failing utility and abort the
//!   remaining sequence without undoing prior units;
//! - unsupported operations fail explicitly instead of pretending success.
//!
//! Lock contention is deliberately not an error at the store boundary (the
//! lock calls return `Ok(false)`), but a backend that needed the lock and did
//! not get it reports [`Error::LockNotAcquired`] so the outer reconciliation
//! loop can retry later.

use thiserror::Error;

/// Common Gantry error conditions.
#[derive(Debug, Error)]
pub enum Error {
    /// No desired version could be resolved for a utility, neither from the
    /// cluster record nor from the configured defaults.
    #[error("no desired version resolved for utility {utility}")]
    UnresolvedDesiredVersion { utility: String },

    /// The installation references a database identifier outside the
    /// supported set.
    #[error("unsupported database type: {database:?}")]
    UnsupportedDatabase { database: String },

    /// A prerequisite step failed before any utility was touched.
    #[error("prerequisite {prerequisite} failed")]
    Prerequisite {
        prerequisite: String,
        #[source]
        source: Box<Error>,
    },

    /// A single utility failed during create/upgrade/destroy. Utilities
    /// earlier in the sequence keep their recorded state.
    #[error("utility {utility} failed")]
    Utility {
        utility: String,
        #[source]
        source: Box<Error>,
    },

    /// The advisory lock on a shared resource was held by someone else.
    /// This signals contention, not malfunction; callers should retry.
    #[error("lock on {resource_id} not acquired")]
    LockNotAcquired { resource_id: String },

    /// A multitenant database record disappeared between selection and the
    /// locked re-read.
    #[error("multitenant database {id} not found")]
    MultitenantDatabaseNotFound { id: String },

    /// An installation's workload placement could not be determined before
    /// mutating shared database state.
    #[error("expected exactly one cluster installation for {installation_id}, found {count}")]
    UnexpectedClusterInstallationCount {
        installation_id: String,
        count: usize,
    },

    /// The selected multitenant database filled up between selection and the
    /// locked re-read.
    #[error("multitenant database {database_id} is at capacity")]
    DatabaseCapacityExhausted { database_id: String },

    /// The installation has no multitenant database assigned yet.
    #[error("installation {installation_id} is not assigned to a multitenant database")]
    InstallationNotAssigned { installation_id: String },

    /// Data preservation was requested from a backend that cannot honor it.
    #[error("data retention is not supported by the {database} database backend")]
    DataRetentionUnsupported { database: String },

    /// The operation is not implemented by this database backend.
    #[error("{operation} is not implemented")]
    NotImplemented { operation: String },

    /// Failure reported by the cluster/installation persistence layer.
    #[error("store error: {message}")]
    Store { message: String },

    /// Failure reported by the cloud resource client.
    #[error("cloud client error: {message}")]
    Cloud { message: String },

    /// Failure reported by the chart installer.
    #[error("chart client error: {message}")]
    Chart { message: String },
}

impl Error {
    /// Wrap a prerequisite failure with the name of the failing step.
    pub fn prerequisite(prerequisite: impl Into<String>, source: Error) -> Self {
        Self::Prerequisite {
            prerequisite: prerequisite.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a per-utility failure with the utility's canonical name.
    pub fn utility(utility: impl Into<String>, source: Error) -> Self {
        Self::Utility {
            utility: utility.into(),
            source: Box::new(source),
        }
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a cloud client error.
    pub fn cloud(message: impl Into<String>) -> Self {
        Self::Cloud {
            message: message.into(),
        }
    }

    /// Create a chart client error.
    pub fn chart(message: impl Into<String>) -> Self {
        Self::Chart {
            message: message.into(),
        }
    }

    /// Create a not-implemented error for the given operation.
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
        }
    }

    /// Check if this error indicates transient contention that the outer
    /// reconciliation loop should retry.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::LockNotAcquired { .. } | Self::DatabaseCapacityExhausted { .. } => true,
            Self::Prerequisite { source, .. } | Self::Utility { source, .. } => {
                source.is_retriable()
            }
            _ => false,
        }
    }
}

/// Result type using the Gantry error.
pub type Result<T> = std::result::Result<T, Error>;
