//! Port interfaces for sync operations

use async_trait::async_trait;
use dogcamp_domain::{
    Campsite, CatalogPage, FacilityTag, PetPolicy, Result, SourceFeed, SyncRun,
};

/// Campsite store access keyed by the deterministic external id.
#[async_trait]
pub trait CampsiteRepository: Send + Sync {
    /// Look up a campsite by its external id.
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Campsite>>;

    /// Insert a freshly imported campsite.
    async fn insert(&self, campsite: &Campsite) -> Result<()>;

    /// Overwrite all mapped fields of an existing campsite.
    async fn update(&self, campsite: &Campsite) -> Result<()>;
}

/// Pet policy rows, one-to-one with campsites.
#[async_trait]
pub trait PetPolicyRepository: Send + Sync {
    /// Get the policy row for a campsite, if any.
    async fn find_by_campsite(&self, campsite_id: &str) -> Result<Option<PetPolicy>>;

    /// Insert a new policy row.
    async fn insert(&self, policy: &PetPolicy) -> Result<()>;

    /// Overwrite an existing policy row in place.
    async fn update(&self, policy: &PetPolicy) -> Result<()>;
}

/// Facility tags and their many-to-many links to campsites.
#[async_trait]
pub trait FacilityRepository: Send + Sync {
    /// Look up a tag by exact name.
    async fn find_tag_by_name(&self, name: &str) -> Result<Option<FacilityTag>>;

    /// Create a new tag.
    async fn insert_tag(&self, tag: &FacilityTag) -> Result<()>;

    /// Link a campsite to a tag; a no-op when the link already exists.
    async fn link(&self, campsite_id: &str, tag_id: &str) -> Result<()>;
}

/// Durable per-feed state: cursor and daily call budget.
#[async_trait]
pub trait SourceFeedRepository: Send + Sync {
    /// Find a feed row by its unique name.
    async fn find_by_name(&self, name: &str) -> Result<Option<SourceFeed>>;

    /// Create a feed row (first sync against this source).
    async fn insert(&self, feed: &SourceFeed) -> Result<()>;

    /// Durably persist cursor and call-budget state after a completed batch.
    async fn save_progress(
        &self,
        feed_id: &str,
        cursor: i64,
        calls_used_today: i64,
        last_call_date: &str,
    ) -> Result<()>;

    /// Reset the daily call counter for a new calendar date.
    async fn reset_daily_calls(&self, feed_id: &str, date: &str) -> Result<()>;
}

/// Append-only audit log of sync runs.
#[async_trait]
pub trait SyncRunRepository: Send + Sync {
    /// Record a run in RUNNING state.
    async fn create(&self, run: &SyncRun) -> Result<()>;

    /// Move a run to its terminal state with final tallies.
    async fn finalize(&self, run: &SyncRun) -> Result<()>;
}

/// Paged read access to the remote catalog.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Fetch one remote page (1-based page number).
    ///
    /// Every upstream item occupies exactly one entry, invalid ones as
    /// rejected slots, so entry positions stay aligned with logical corpus
    /// indices. `total_count` reflects the envelope's corpus size, falling
    /// back to the page's own entry count when the metadata is absent. A
    /// transport failure or an API-level error envelope is an `Err`, never
    /// an empty page.
    async fn fetch_page(&self, page_no: u32, page_size: u32) -> Result<CatalogPage>;
}
