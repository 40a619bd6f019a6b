//! # DogCamp Infra
//!
//! Infrastructure adapters for the DogCamp sync engine.
//!
//! This crate contains:
//! - SQLite repositories (rusqlite pooled through r2d2) for the core ports
//! - The GoCamping HTTP catalog client (reqwest)
//! - Configuration loading from environment variables or files
//! - Conversions from external errors into domain errors
//!
//! ## Architecture Principles
//! - Implements the port traits defined in `dogcamp-core`
//! - All blocking database work runs on the tokio blocking pool
//! - No business logic; adapters translate between the outside world and
//!   the domain

pub mod config;
pub mod database;
pub mod errors;
pub mod remote;

pub use database::{
    DbManager, SqliteCampsiteRepository, SqliteFacilityRepository, SqlitePetPolicyRepository,
    SqliteSourceFeedRepository, SqliteSyncRunRepository,
};
pub use errors::InfraError;
pub use remote::{GoCampingClient, GoCampingClientConfig, SyncError, SyncErrorCategory};
