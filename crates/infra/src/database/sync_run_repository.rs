//! Sync run audit log repository using pooled SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use dogcamp_core::SyncRunRepository;
use dogcamp_domain::{DogCampError, Result as DomainResult, SyncRun, SyncRunStatus};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::DbManager;
use super::{map_join_error, map_sql_error};

/// SQLite-backed implementation of `SyncRunRepository`.
pub struct SqliteSyncRunRepository {
    db: Arc<DbManager>,
}

impl SqliteSyncRunRepository {
    /// Create a new repository instance.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Fetch a run by id. Used by tests and diagnostics.
    pub async fn find_by_id(&self, id: &str) -> DomainResult<Option<SyncRun>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<SyncRun>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                "SELECT id, feed_id, status, started_at, completed_at,
                        items_processed, items_created, items_updated, items_failed, message
                 FROM sync_runs WHERE id = ?1",
                params![&id],
                map_run_row,
            );

            match result {
                Ok(run) => Ok(Some(run)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl SyncRunRepository for SqliteSyncRunRepository {
    async fn create(&self, run: &SyncRun) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let run = run.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO sync_runs (
                    id, feed_id, status, started_at, completed_at,
                    items_processed, items_created, items_updated, items_failed, message
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    run.id,
                    run.feed_id,
                    run.status.as_str(),
                    run.started_at,
                    run.completed_at,
                    run.items_processed,
                    run.items_created,
                    run.items_updated,
                    run.items_failed,
                    run.message,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn finalize(&self, run: &SyncRun) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let run = run.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE sync_runs SET
                        status = ?1, completed_at = ?2, items_processed = ?3,
                        items_created = ?4, items_updated = ?5, items_failed = ?6, message = ?7
                     WHERE id = ?8",
                    params![
                        run.status.as_str(),
                        run.completed_at,
                        run.items_processed,
                        run.items_created,
                        run.items_updated,
                        run.items_failed,
                        run.message,
                        run.id,
                    ],
                )
                .map_err(map_sql_error)?;

            if changed == 0 {
                return Err(DogCampError::NotFound(format!("sync run {}", run.id)));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_run_row(row: &Row<'_>) -> rusqlite::Result<SyncRun> {
    let status: String = row.get(2)?;
    let status = SyncRunStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown sync run status: {status}").into(),
        )
    })?;

    Ok(SyncRun {
        id: row.get(0)?,
        feed_id: row.get(1)?,
        status,
        started_at: row.get(3)?,
        completed_at: row.get(4)?,
        items_processed: row.get(5)?,
        items_created: row.get(6)?,
        items_updated: row.get(7)?,
        items_failed: row.get(8)?,
        message: row.get(9)?,
    })
}
