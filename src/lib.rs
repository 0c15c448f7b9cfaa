//! Gantry - multi-tenant cluster provisioning control plane core.
//!
//! Gantry reconciles per-cluster infrastructure utilities against a
//! desired-version record and manages shared multi-tenant database
//! capacity for independent application installations. Both flows mutate
//! shared, persisted state and tolerate being invoked again after partial
//! failure: reconciliation is idempotent and re-entrant, and multitenant
//! occupancy changes happen only under an advisory lock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Supervisor / API layer (external)               │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌───────────────────────────────┴─────────────────────────────────┐
//! │ Utility Group                    │ Database Backends            │
//! │ ordered reconciliation,          │ operator / single-tenant /   │
//! │ per-unit version persistence     │ multitenant allocation       │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────┴─────────────────────────────────┐
//! │ Stores (clusters, installations, multitenant databases, locks)  │
//! │ Cloud client │ Chart installer      (collaborator boundaries)   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! ## Core
//! - [`core::config`] - Configuration parsing and validation
//! - [`core::error`] - Error taxonomy and retriability
//!
//! ## Model
//! - [`model::cluster`] - Cluster records and utility version metadata
//! - [`model::installation`] - Installations and database backend selection
//! - [`model::multitenant`] - Shared multitenant database records
//! - [`model::lock`] - Advisory lock state
//!
//! ## Persistence
//! - [`store`] - Store contracts and the in-memory reference store
//!
//! ## Reconciliation
//! - [`utility`] - Per-cluster utilities and the ordered utility group
//! - [`database`] - Database backend abstraction and variants
//!
//! ## Collaborators
//! - [`cloud`] - Cloud resource client boundary
//! - [`chart`] - Chart/package installer boundary
//!
//! ## CLI
//! - [`cli::commands`] - CLI command implementations
//!
//! # Key Invariants
//!
//! - **FIXED-ORDER**: utilities reconcile and destroy in one fixed
//!   dependency order, never reordered or reversed
//! - **PERSIST-PER-UNIT**: each utility's actual version is persisted
//!   immediately after that utility reconciles
//! - **LOCK-BEFORE-MUTATE**: multitenant occupancy changes only under the
//!   record's advisory lock, against state re-read under that lock
//! - **ONE-DATABASE-PER-INSTALLATION**: an installation occupies at most
//!   one multitenant database at a time

// Core infrastructure
pub mod core;

// Persistent record types
pub mod model;

// Persistence contracts and reference store
pub mod store;

// Database backend abstraction
pub mod database;

// Per-cluster utilities and orchestration
pub mod utility;

// Collaborator boundaries
pub mod chart;
pub mod cloud;

// CLI
pub mod cli;

// Re-exports for convenience
pub use self::core::{config, error};
pub use database::{database_for, Database};
pub use model::{Cluster, Installation, MultitenantDatabase};
pub use store::{ClusterStore, InstallationDatabaseStore, MemoryStore};
pub use utility::{Utility, UtilityGroup};
