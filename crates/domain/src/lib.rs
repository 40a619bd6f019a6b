//! # DogCamp Domain
//!
//! Business domain types and models for the DogCamp sync engine.
//!
//! This crate contains:
//! - Domain data types (Campsite, PetPolicy, SourceFeed, SyncRun, ...)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other DogCamp crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
