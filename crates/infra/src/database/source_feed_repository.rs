//! Source feed repository implementation using pooled SQLite.
//!
//! The feed row is the durable side of the resumable cursor and the daily
//! call budget; `save_progress` is on the hot path after every batch.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dogcamp_core::SourceFeedRepository;
use dogcamp_domain::{DogCampError, Result as DomainResult, SourceFeed};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::DbManager;
use super::{bool_to_int, int_to_bool, map_join_error, map_sql_error};

/// SQLite-backed implementation of `SourceFeedRepository`.
pub struct SqliteSourceFeedRepository {
    db: Arc<DbManager>,
}

impl SqliteSourceFeedRepository {
    /// Create a new repository instance.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SourceFeedRepository for SqliteSourceFeedRepository {
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<SourceFeed>> {
        let db = Arc::clone(&self.db);
        let name = name.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<SourceFeed>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                "SELECT id, name, base_url, enabled, cursor, daily_call_budget,
                        calls_used_today, last_call_date, created_at, updated_at
                 FROM source_feeds WHERE name = ?1",
                params![&name],
                map_feed_row,
            );

            match result {
                Ok(feed) => Ok(Some(feed)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, feed: &SourceFeed) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let feed = feed.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO source_feeds (
                    id, name, base_url, enabled, cursor, daily_call_budget,
                    calls_used_today, last_call_date, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    feed.id,
                    feed.name,
                    feed.base_url,
                    bool_to_int(feed.enabled),
                    feed.cursor,
                    feed.daily_call_budget,
                    feed.calls_used_today,
                    feed.last_call_date,
                    feed.created_at,
                    feed.updated_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn save_progress(
        &self,
        feed_id: &str,
        cursor: i64,
        calls_used_today: i64,
        last_call_date: &str,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let feed_id = feed_id.to_string();
        let last_call_date = last_call_date.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE source_feeds SET
                        cursor = ?1, calls_used_today = ?2, last_call_date = ?3, updated_at = ?4
                     WHERE id = ?5",
                    params![cursor, calls_used_today, last_call_date, Utc::now().timestamp(), feed_id],
                )
                .map_err(map_sql_error)?;

            if changed == 0 {
                return Err(DogCampError::NotFound(format!("source feed {feed_id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn reset_daily_calls(&self, feed_id: &str, date: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let feed_id = feed_id.to_string();
        let date = date.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE source_feeds SET
                        calls_used_today = 0, last_call_date = ?1, updated_at = ?2
                     WHERE id = ?3",
                    params![date, Utc::now().timestamp(), feed_id],
                )
                .map_err(map_sql_error)?;

            if changed == 0 {
                return Err(DogCampError::NotFound(format!("source feed {feed_id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_feed_row(row: &Row<'_>) -> rusqlite::Result<SourceFeed> {
    Ok(SourceFeed {
        id: row.get(0)?,
        name: row.get(1)?,
        base_url: row.get(2)?,
        enabled: int_to_bool(row.get(3)?),
        cursor: row.get(4)?,
        daily_call_budget: row.get(5)?,
        calls_used_today: row.get(6)?,
        last_call_date: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
