//! Sync orchestrator.
//!
//! Drives one resumable sync run end-to-end: load durable feed state, roll
//! the daily call counter over on a date change, open a RUNNING audit row,
//! loop over batches gated by the call budget, persist the cursor after every
//! completed batch, and finalize the audit row exactly once - on the success,
//! partial-completion and fatal-error paths alike.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dogcamp_domain::constants::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_DAILY_CALL_BUDGET, GOCAMPING_FEED_NAME,
    INTER_PAGE_DELAY_MS, MAX_RUN_MESSAGE_LEN, REMOTE_PAGE_SIZE,
};
use dogcamp_domain::{
    CatalogEntry, DogCampError, Result, SourceFeed, SyncConfig, SyncReport, SyncRun,
    SyncRunStatus,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::pager::BatchPlan;
use super::ports::{RemoteCatalog, SourceFeedRepository, SyncRunRepository};
use super::reconciler::{ReconcileOutcome, Reconciler};

/// Tunables for one orchestrator instance.
#[derive(Debug, Clone)]
pub struct SyncServiceConfig {
    /// Stable name of the feed row this service owns.
    pub feed_name: String,
    /// Base URL recorded on a freshly created feed row.
    pub base_url: String,
    /// Daily call budget applied when the feed row is first created.
    pub daily_call_budget: i64,
    /// Logical records per batch (one cursor advance).
    pub batch_size: u32,
    /// Remote page size.
    pub page_size: u32,
    /// Fixed delay between successive page fetches within one batch.
    pub inter_page_delay: Duration,
    /// Cap on batches per run; `None` runs to corpus or budget exhaustion.
    pub max_batches: Option<u32>,
}

impl Default for SyncServiceConfig {
    fn default() -> Self {
        Self {
            feed_name: GOCAMPING_FEED_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            daily_call_budget: DEFAULT_DAILY_CALL_BUDGET,
            batch_size: DEFAULT_BATCH_SIZE,
            page_size: REMOTE_PAGE_SIZE,
            inter_page_delay: Duration::from_millis(INTER_PAGE_DELAY_MS),
            max_batches: None,
        }
    }
}

impl SyncServiceConfig {
    /// Build service tunables from loaded application configuration.
    pub fn from_sync_config(config: &SyncConfig, base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            daily_call_budget: config.daily_call_budget,
            batch_size: config.batch_size,
            page_size: config.page_size,
            inter_page_delay: Duration::from_millis(config.inter_page_delay_ms),
            max_batches: config.max_batches,
            ..Self::default()
        }
    }
}

/// Mutable state accumulated over one run.
#[derive(Debug, Default)]
struct RunProgress {
    cursor: i64,
    total_count: i64,
    budget: i64,
    calls_used: i64,
    processed: i64,
    created: i64,
    updated: i64,
    failed: i64,
}

impl RunProgress {
    fn calls_remaining(&self) -> i64 {
        (self.budget - self.calls_used).max(0)
    }

    fn is_complete(&self) -> bool {
        self.total_count > 0 && self.cursor >= self.total_count
    }
}

/// Sync orchestrator over the feed/run/store/catalog ports.
///
/// Assumes at most one active run per feed; concurrent invocations would
/// race on the persisted cursor.
pub struct SyncService {
    feeds: Arc<dyn SourceFeedRepository>,
    runs: Arc<dyn SyncRunRepository>,
    catalog: Arc<dyn RemoteCatalog>,
    reconciler: Reconciler,
    config: SyncServiceConfig,
}

impl SyncService {
    /// Create a new orchestrator.
    pub fn new(
        feeds: Arc<dyn SourceFeedRepository>,
        runs: Arc<dyn SyncRunRepository>,
        catalog: Arc<dyn RemoteCatalog>,
        reconciler: Reconciler,
        config: SyncServiceConfig,
    ) -> Self {
        Self { feeds, runs, catalog, reconciler, config }
    }

    /// Run one sync invocation and return a structured summary.
    ///
    /// Fatal errors inside the batch loop finalize the audit row as FAILED
    /// and come back as a report with `success == false`; `Err` is reserved
    /// for failures before any audit row exists (store unavailable, feed row
    /// unreadable).
    #[instrument(skip(self), fields(feed = %self.config.feed_name))]
    pub async fn run(&self) -> Result<SyncReport> {
        let mut feed = self.load_feed_state().await?;
        let today = Utc::now().date_naive().to_string();

        if feed.last_call_date.as_deref() != Some(today.as_str()) {
            info!(
                previous = feed.last_call_date.as_deref().unwrap_or("never"),
                today = %today,
                "date changed, resetting daily call counter"
            );
            self.feeds.reset_daily_calls(&feed.id, &today).await?;
            feed.calls_used_today = 0;
            feed.last_call_date = Some(today.clone());
        }

        let mut run = SyncRun {
            id: Uuid::new_v4().to_string(),
            feed_id: feed.id.clone(),
            status: SyncRunStatus::Running,
            started_at: Utc::now().timestamp(),
            completed_at: None,
            items_processed: 0,
            items_created: 0,
            items_updated: 0,
            items_failed: 0,
            message: None,
        };
        self.runs.create(&run).await?;

        let mut progress = RunProgress {
            cursor: feed.cursor,
            budget: feed.daily_call_budget,
            calls_used: feed.calls_used_today,
            ..RunProgress::default()
        };

        let outcome = self.drive(&feed, &today, &mut progress).await;

        run.completed_at = Some(Utc::now().timestamp());
        run.items_processed = progress.processed;
        run.items_created = progress.created;
        run.items_updated = progress.updated;
        run.items_failed = progress.failed;

        match outcome {
            Ok(()) => {
                let message = completion_message(&progress);
                run.status = SyncRunStatus::Success;
                run.message = Some(message.clone());
                self.runs.finalize(&run).await?;

                info!(
                    processed = progress.processed,
                    created = progress.created,
                    updated = progress.updated,
                    failed = progress.failed,
                    complete = progress.is_complete(),
                    "sync run finished"
                );
                Ok(self.report(&progress, true, message))
            }
            Err(err) => {
                // Cursor advancement from completed batches is already
                // durable; only the audit row still needs its terminal state.
                let message = truncate_message(&err.to_string());
                run.status = SyncRunStatus::Failed;
                run.message = Some(message.clone());
                self.runs.finalize(&run).await?;

                warn!(error = %err, "sync run failed");
                Ok(self.report(&progress, false, message))
            }
        }
    }

    /// Load the feed row, creating a fresh zero-state row on first sync.
    async fn load_feed_state(&self) -> Result<SourceFeed> {
        if let Some(feed) = self.feeds.find_by_name(&self.config.feed_name).await? {
            return Ok(feed);
        }

        let now = Utc::now().timestamp();
        let feed = SourceFeed {
            id: Uuid::new_v4().to_string(),
            name: self.config.feed_name.clone(),
            base_url: self.config.base_url.clone(),
            enabled: true,
            cursor: 0,
            daily_call_budget: self.config.daily_call_budget,
            calls_used_today: 0,
            last_call_date: None,
            created_at: now,
            updated_at: now,
        };
        self.feeds.insert(&feed).await?;
        info!(feed = %feed.name, "created source feed");
        Ok(feed)
    }

    /// The batch loop. Per-item failures are tallied and absorbed here;
    /// page-fetch failures propagate as fatal.
    async fn drive(
        &self,
        feed: &SourceFeed,
        today: &str,
        progress: &mut RunProgress,
    ) -> Result<()> {
        if progress.calls_remaining() == 0 {
            info!(
                calls_used = progress.calls_used,
                budget = progress.budget,
                "daily call budget already exhausted"
            );
            return Ok(());
        }

        // Total-count discovery costs one call; the batch loop refetches the
        // pages it needs.
        let first_page = self.catalog.fetch_page(1, self.config.page_size).await?;
        progress.calls_used += 1;
        // The discovery call counts against the budget even when no batch
        // commits afterwards.
        self.feeds
            .save_progress(&feed.id, progress.cursor, progress.calls_used, today)
            .await?;
        progress.total_count = if first_page.total_count > 0 {
            first_page.total_count
        } else {
            first_page.items.len() as i64
        };

        if progress.total_count == 0 {
            return Err(DogCampError::RemoteApi("remote catalog returned no records".into()));
        }

        if progress.cursor >= progress.total_count {
            info!(
                cursor = progress.cursor,
                total = progress.total_count,
                "corpus already fully processed"
            );
            return Ok(());
        }

        let mut batches = 0u32;
        while progress.cursor < progress.total_count && progress.calls_remaining() > 0 {
            if let Some(max) = self.config.max_batches {
                if batches >= max {
                    debug!(batches, "batch cap reached");
                    break;
                }
            }

            let batch_end =
                (progress.cursor + i64::from(self.config.batch_size)).min(progress.total_count);
            let Some(plan) = BatchPlan::for_range(
                progress.cursor as u64,
                batch_end as u64,
                self.config.page_size,
            ) else {
                break;
            };

            let fetched = self.fetch_planned_pages(&plan, progress).await?;
            let items = plan.slice(&fetched);
            if items.is_empty() {
                warn!(cursor = progress.cursor, "remote returned no records for batch");
                break;
            }

            self.reconcile_batch(&items, progress).await;

            // Advance by what was actually processed; a budget-shortened
            // fetch must not skip unseen records.
            progress.cursor += items.len() as i64;
            self.feeds
                .save_progress(&feed.id, progress.cursor, progress.calls_used, today)
                .await?;
            batches += 1;

            info!(
                batch = batches,
                cursor = progress.cursor,
                total = progress.total_count,
                calls_used = progress.calls_used,
                budget = progress.budget,
                "batch committed"
            );
        }

        Ok(())
    }

    /// Fetch the pages a plan requires, honoring the remaining budget and
    /// pausing between successive pages.
    async fn fetch_planned_pages(
        &self,
        plan: &BatchPlan,
        progress: &mut RunProgress,
    ) -> Result<Vec<CatalogEntry>> {
        let mut fetched = Vec::with_capacity(plan.len());
        let last_page = *plan.pages().end();

        for page_no in plan.pages() {
            if progress.calls_remaining() == 0 {
                warn!(page_no, "call budget exhausted mid-batch");
                break;
            }

            let page = self.catalog.fetch_page(page_no, self.config.page_size).await?;
            progress.calls_used += 1;
            fetched.extend(page.items);

            if page_no < last_page {
                tokio::time::sleep(self.config.inter_page_delay).await;
            }
        }

        Ok(fetched)
    }

    async fn reconcile_batch(&self, entries: &[CatalogEntry], progress: &mut RunProgress) {
        for entry in entries {
            progress.processed += 1;
            let raw = match entry {
                CatalogEntry::Valid(raw) => raw,
                CatalogEntry::Rejected { content_id } => {
                    // A malformed slot still occupies its corpus index;
                    // tally it so the cursor can pass it.
                    warn!(
                        content_id = content_id.as_deref().unwrap_or("unknown"),
                        "rejected record counted as failed"
                    );
                    progress.failed += 1;
                    continue;
                }
            };

            match self.reconciler.reconcile(raw).await {
                Ok(ReconcileOutcome::Created) => progress.created += 1,
                Ok(ReconcileOutcome::Updated) => progress.updated += 1,
                Err(err) => {
                    warn!(content_id = %raw.content_id, error = %err, "record failed");
                    progress.failed += 1;
                }
            }
        }
    }

    fn report(&self, progress: &RunProgress, success: bool, message: String) -> SyncReport {
        SyncReport {
            success,
            items_processed: progress.processed,
            items_created: progress.created,
            items_updated: progress.updated,
            items_failed: progress.failed,
            last_processed_index: progress.cursor,
            total_count: progress.total_count,
            is_complete: progress.is_complete(),
            calls_used: progress.calls_used,
            calls_remaining: progress.calls_remaining(),
            message,
        }
    }
}

fn completion_message(progress: &RunProgress) -> String {
    if progress.is_complete() {
        format!("full sync complete ({}/{})", progress.cursor, progress.total_count)
    } else {
        format!(
            "partial sync ({}/{}), next run resumes at {}",
            progress.cursor, progress.total_count, progress.cursor
        )
    }
}

fn truncate_message(message: &str) -> String {
    if message.len() <= MAX_RUN_MESSAGE_LEN {
        return message.to_string();
    }

    let mut truncated =
        message.chars().take(MAX_RUN_MESSAGE_LEN.saturating_sub(3)).collect::<String>();
    truncated.push_str("...");
    truncated
}
