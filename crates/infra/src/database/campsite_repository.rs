//! Campsite repository implementation using pooled SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use dogcamp_core::CampsiteRepository;
use dogcamp_domain::{Campsite, Result as DomainResult};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::DbManager;
use super::{map_join_error, map_sql_error};

const CAMPSITE_COLUMNS: &str = "id, external_id, name, address, region, latitude, longitude,
        phone, main_image_url, external_url, intro, created_at, updated_at";

/// SQLite-backed implementation of `CampsiteRepository`.
pub struct SqliteCampsiteRepository {
    db: Arc<DbManager>,
}

impl SqliteCampsiteRepository {
    /// Create a new repository instance.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CampsiteRepository for SqliteCampsiteRepository {
    async fn find_by_external_id(&self, external_id: &str) -> DomainResult<Option<Campsite>> {
        let db = Arc::clone(&self.db);
        let external_id = external_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Campsite>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                &format!("SELECT {CAMPSITE_COLUMNS} FROM campsites WHERE external_id = ?1"),
                params![&external_id],
                map_campsite_row,
            );

            match result {
                Ok(campsite) => Ok(Some(campsite)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, campsite: &Campsite) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let campsite = campsite.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO campsites (
                    id, external_id, name, address, region, latitude, longitude,
                    phone, main_image_url, external_url, intro, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    campsite.id,
                    campsite.external_id,
                    campsite.name,
                    campsite.address,
                    campsite.region,
                    campsite.latitude,
                    campsite.longitude,
                    campsite.phone,
                    campsite.main_image_url,
                    campsite.external_url,
                    campsite.intro,
                    campsite.created_at,
                    campsite.updated_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, campsite: &Campsite) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let campsite = campsite.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE campsites SET
                    name = ?1, address = ?2, region = ?3, latitude = ?4, longitude = ?5,
                    phone = ?6, main_image_url = ?7, external_url = ?8, intro = ?9,
                    updated_at = ?10
                 WHERE id = ?11",
                params![
                    campsite.name,
                    campsite.address,
                    campsite.region,
                    campsite.latitude,
                    campsite.longitude,
                    campsite.phone,
                    campsite.main_image_url,
                    campsite.external_url,
                    campsite.intro,
                    campsite.updated_at,
                    campsite.id,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_campsite_row(row: &Row<'_>) -> rusqlite::Result<Campsite> {
    Ok(Campsite {
        id: row.get(0)?,
        external_id: row.get(1)?,
        name: row.get(2)?,
        address: row.get(3)?,
        region: row.get(4)?,
        latitude: row.get(5)?,
        longitude: row.get(6)?,
        phone: row.get(7)?,
        main_image_url: row.get(8)?,
        external_url: row.get(9)?,
        intro: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}
