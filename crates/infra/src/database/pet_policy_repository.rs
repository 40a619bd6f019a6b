//! Pet policy repository implementation using pooled SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use dogcamp_core::PetPolicyRepository;
use dogcamp_domain::{PetPolicy, PetSizeCategory, Result as DomainResult};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::DbManager;
use super::{bool_to_int, int_to_bool, map_join_error, map_sql_error};

/// SQLite-backed implementation of `PetPolicyRepository`.
pub struct SqlitePetPolicyRepository {
    db: Arc<DbManager>,
}

impl SqlitePetPolicyRepository {
    /// Create a new repository instance.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PetPolicyRepository for SqlitePetPolicyRepository {
    async fn find_by_campsite(&self, campsite_id: &str) -> DomainResult<Option<PetPolicy>> {
        let db = Arc::clone(&self.db);
        let campsite_id = campsite_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<PetPolicy>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                "SELECT id, campsite_id, allowed, size_category, max_pets, extra_fee, note
                 FROM pet_policies WHERE campsite_id = ?1",
                params![&campsite_id],
                map_policy_row,
            );

            match result {
                Ok(policy) => Ok(Some(policy)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, policy: &PetPolicy) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let policy = policy.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO pet_policies (
                    id, campsite_id, allowed, size_category, max_pets, extra_fee, note
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    policy.id,
                    policy.campsite_id,
                    bool_to_int(policy.allowed),
                    policy.size_category.map(PetSizeCategory::as_str),
                    policy.max_pets,
                    policy.extra_fee,
                    policy.note,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, policy: &PetPolicy) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let policy = policy.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE pet_policies SET
                    allowed = ?1, size_category = ?2, max_pets = ?3, extra_fee = ?4, note = ?5
                 WHERE id = ?6",
                params![
                    bool_to_int(policy.allowed),
                    policy.size_category.map(PetSizeCategory::as_str),
                    policy.max_pets,
                    policy.extra_fee,
                    policy.note,
                    policy.id,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_policy_row(row: &Row<'_>) -> rusqlite::Result<PetPolicy> {
    let size_category: Option<String> = row.get(3)?;
    Ok(PetPolicy {
        id: row.get(0)?,
        campsite_id: row.get(1)?,
        allowed: int_to_bool(row.get(2)?),
        size_category: size_category.as_deref().and_then(PetSizeCategory::parse),
        max_pets: row.get(4)?,
        extra_fee: row.get(5)?,
        note: row.get(6)?,
    })
}
