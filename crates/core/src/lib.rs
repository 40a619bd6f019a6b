//! # DogCamp Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The pet-policy and facility text classifier
//! - Port/adapter interfaces (traits) for the store and the remote catalog
//! - The batch planner, upsert reconciler, and sync orchestrator
//!
//! ## Architecture Principles
//! - Only depends on `dogcamp-domain`
//! - No database or HTTP code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod classify;
pub mod sync;

// Re-export specific items to avoid ambiguity
pub use classify::{classify_pet_policy, parse_facility_list, PetPolicyClassification};
pub use sync::pager::BatchPlan;
pub use sync::ports::{
    CampsiteRepository, FacilityRepository, PetPolicyRepository, RemoteCatalog,
    SourceFeedRepository, SyncRunRepository,
};
pub use sync::reconciler::{ReconcileOutcome, Reconciler};
pub use sync::service::{SyncService, SyncServiceConfig};
