//! Facility tag repository implementation using pooled SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use dogcamp_core::FacilityRepository;
use dogcamp_domain::{FacilityTag, Result as DomainResult};
use rusqlite::params;
use tokio::task;

use super::manager::DbManager;
use super::{map_join_error, map_sql_error};

/// SQLite-backed implementation of `FacilityRepository`.
pub struct SqliteFacilityRepository {
    db: Arc<DbManager>,
}

impl SqliteFacilityRepository {
    /// Create a new repository instance.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FacilityRepository for SqliteFacilityRepository {
    async fn find_tag_by_name(&self, name: &str) -> DomainResult<Option<FacilityTag>> {
        let db = Arc::clone(&self.db);
        let name = name.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<FacilityTag>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                "SELECT id, name FROM facility_tags WHERE name = ?1",
                params![&name],
                |row| Ok(FacilityTag { id: row.get(0)?, name: row.get(1)? }),
            );

            match result {
                Ok(tag) => Ok(Some(tag)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert_tag(&self, tag: &FacilityTag) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let tag = tag.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO facility_tags (id, name) VALUES (?1, ?2)",
                params![tag.id, tag.name],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn link(&self, campsite_id: &str, tag_id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let campsite_id = campsite_id.to_string();
        let tag_id = tag_id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT OR IGNORE INTO campsite_facilities (campsite_id, tag_id) VALUES (?1, ?2)",
                params![campsite_id, tag_id],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}
