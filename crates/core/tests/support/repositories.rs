//! In-memory mock implementations of the store ports.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use dogcamp_core::{
    CampsiteRepository, FacilityRepository, PetPolicyRepository, SourceFeedRepository,
    SyncRunRepository,
};
use dogcamp_domain::{
    Campsite, DogCampError, FacilityTag, PetPolicy, Result as DomainResult, SourceFeed, SyncRun,
};
use tokio::sync::Mutex as TokioMutex;

/// In-memory campsite/policy/facility store.
///
/// `poison_external_ids` makes campsite writes for those external ids fail,
/// for exercising item-level failure tallies.
#[derive(Default)]
pub struct InMemoryStore {
    pub campsites: TokioMutex<HashMap<String, Campsite>>,
    pub policies: TokioMutex<HashMap<String, PetPolicy>>,
    pub tags: TokioMutex<HashMap<String, FacilityTag>>,
    pub links: TokioMutex<Vec<(String, String)>>,
    pub poison_external_ids: HashSet<String>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_poisoned_external_ids(ids: impl IntoIterator<Item = String>) -> Arc<Self> {
        Arc::new(Self { poison_external_ids: ids.into_iter().collect(), ..Self::default() })
    }

    pub async fn campsite_count(&self) -> usize {
        self.campsites.lock().await.len()
    }

    pub async fn policy_count(&self) -> usize {
        self.policies.lock().await.len()
    }

    pub async fn tag_count(&self) -> usize {
        self.tags.lock().await.len()
    }
}

#[async_trait]
impl CampsiteRepository for InMemoryStore {
    async fn find_by_external_id(&self, external_id: &str) -> DomainResult<Option<Campsite>> {
        let campsites = self.campsites.lock().await;
        Ok(campsites.values().find(|c| c.external_id == external_id).cloned())
    }

    async fn insert(&self, campsite: &Campsite) -> DomainResult<()> {
        if self.poison_external_ids.contains(&campsite.external_id) {
            return Err(DogCampError::Database("unique constraint violation".into()));
        }
        self.campsites.lock().await.insert(campsite.id.clone(), campsite.clone());
        Ok(())
    }

    async fn update(&self, campsite: &Campsite) -> DomainResult<()> {
        if self.poison_external_ids.contains(&campsite.external_id) {
            return Err(DogCampError::Database("write failed".into()));
        }
        self.campsites.lock().await.insert(campsite.id.clone(), campsite.clone());
        Ok(())
    }
}

#[async_trait]
impl PetPolicyRepository for InMemoryStore {
    async fn find_by_campsite(&self, campsite_id: &str) -> DomainResult<Option<PetPolicy>> {
        let policies = self.policies.lock().await;
        Ok(policies.values().find(|p| p.campsite_id == campsite_id).cloned())
    }

    async fn insert(&self, policy: &PetPolicy) -> DomainResult<()> {
        self.policies.lock().await.insert(policy.id.clone(), policy.clone());
        Ok(())
    }

    async fn update(&self, policy: &PetPolicy) -> DomainResult<()> {
        self.policies.lock().await.insert(policy.id.clone(), policy.clone());
        Ok(())
    }
}

#[async_trait]
impl FacilityRepository for InMemoryStore {
    async fn find_tag_by_name(&self, name: &str) -> DomainResult<Option<FacilityTag>> {
        let tags = self.tags.lock().await;
        Ok(tags.values().find(|t| t.name == name).cloned())
    }

    async fn insert_tag(&self, tag: &FacilityTag) -> DomainResult<()> {
        self.tags.lock().await.insert(tag.id.clone(), tag.clone());
        Ok(())
    }

    async fn link(&self, campsite_id: &str, tag_id: &str) -> DomainResult<()> {
        let mut links = self.links.lock().await;
        let pair = (campsite_id.to_string(), tag_id.to_string());
        if !links.contains(&pair) {
            links.push(pair);
        }
        Ok(())
    }
}

/// In-memory feed state.
#[derive(Default)]
pub struct InMemoryFeeds {
    pub feeds: TokioMutex<HashMap<String, SourceFeed>>,
}

impl InMemoryFeeds {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed an existing feed row (bypassing first-sync creation).
    pub fn with_feed(feed: SourceFeed) -> Arc<Self> {
        let feeds = Self::default();
        feeds.feeds.try_lock().expect("unused lock").insert(feed.id.clone(), feed);
        Arc::new(feeds)
    }

    pub async fn feed_by_name(&self, name: &str) -> Option<SourceFeed> {
        let feeds = self.feeds.lock().await;
        feeds.values().find(|f| f.name == name).cloned()
    }
}

#[async_trait]
impl SourceFeedRepository for InMemoryFeeds {
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<SourceFeed>> {
        let feeds = self.feeds.lock().await;
        Ok(feeds.values().find(|f| f.name == name).cloned())
    }

    async fn insert(&self, feed: &SourceFeed) -> DomainResult<()> {
        self.feeds.lock().await.insert(feed.id.clone(), feed.clone());
        Ok(())
    }

    async fn save_progress(
        &self,
        feed_id: &str,
        cursor: i64,
        calls_used_today: i64,
        last_call_date: &str,
    ) -> DomainResult<()> {
        let mut feeds = self.feeds.lock().await;
        let feed = feeds
            .get_mut(feed_id)
            .ok_or_else(|| DogCampError::NotFound(format!("feed {feed_id}")))?;
        feed.cursor = cursor;
        feed.calls_used_today = calls_used_today;
        feed.last_call_date = Some(last_call_date.to_string());
        Ok(())
    }

    async fn reset_daily_calls(&self, feed_id: &str, date: &str) -> DomainResult<()> {
        let mut feeds = self.feeds.lock().await;
        let feed = feeds
            .get_mut(feed_id)
            .ok_or_else(|| DogCampError::NotFound(format!("feed {feed_id}")))?;
        feed.calls_used_today = 0;
        feed.last_call_date = Some(date.to_string());
        Ok(())
    }
}

/// In-memory audit log.
#[derive(Default)]
pub struct InMemoryRuns {
    pub runs: TokioMutex<Vec<SyncRun>>,
}

impl InMemoryRuns {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn all(&self) -> Vec<SyncRun> {
        self.runs.lock().await.clone()
    }
}

#[async_trait]
impl SyncRunRepository for InMemoryRuns {
    async fn create(&self, run: &SyncRun) -> DomainResult<()> {
        self.runs.lock().await.push(run.clone());
        Ok(())
    }

    async fn finalize(&self, run: &SyncRun) -> DomainResult<()> {
        let mut runs = self.runs.lock().await;
        let slot = runs
            .iter_mut()
            .find(|r| r.id == run.id)
            .ok_or_else(|| DogCampError::NotFound(format!("run {}", run.id)))?;
        *slot = run.clone();
        Ok(())
    }
}
