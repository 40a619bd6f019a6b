//! SQLite implementations of the store ports.

mod campsite_repository;
mod facility_repository;
mod manager;
mod pet_policy_repository;
mod source_feed_repository;
mod sync_run_repository;

pub use campsite_repository::SqliteCampsiteRepository;
pub use facility_repository::SqliteFacilityRepository;
pub use manager::{DbConnection, DbManager};
pub use pet_policy_repository::SqlitePetPolicyRepository;
pub use source_feed_repository::SqliteSourceFeedRepository;
pub use sync_run_repository::SqliteSyncRunRepository;

pub(crate) use manager::map_sql_error;

/// Map a blocking-task join failure into the domain error.
pub(crate) fn map_join_error(err: tokio::task::JoinError) -> dogcamp_domain::DogCampError {
    dogcamp_domain::DogCampError::Internal(format!("task join error: {err}"))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64) -> bool {
    value != 0
}
