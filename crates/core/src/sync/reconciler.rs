//! Per-record create-or-update against the local store.
//!
//! The reconciler decides create vs update by looking up the deterministic
//! external id, writes the campsite row, then brings the related pet-policy
//! row and facility tag links in line with the classified source record.

use std::sync::Arc;

use chrono::Utc;
use dogcamp_domain::{Campsite, FacilityTag, PetPolicy, RawCampingRecord, Result};
use tracing::debug;
use uuid::Uuid;

use crate::classify::{classify_pet_policy, parse_facility_list, PetPolicyClassification};
use super::ports::{CampsiteRepository, FacilityRepository, PetPolicyRepository};

/// How a record was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Created,
    Updated,
}

/// Upsert reconciler over the store ports.
pub struct Reconciler {
    campsites: Arc<dyn CampsiteRepository>,
    policies: Arc<dyn PetPolicyRepository>,
    facilities: Arc<dyn FacilityRepository>,
}

impl Reconciler {
    /// Create a new reconciler.
    pub fn new(
        campsites: Arc<dyn CampsiteRepository>,
        policies: Arc<dyn PetPolicyRepository>,
        facilities: Arc<dyn FacilityRepository>,
    ) -> Self {
        Self { campsites, policies, facilities }
    }

    /// Reconcile one validated remote record.
    ///
    /// Errors from any individual store write bubble up so the caller can
    /// tally the record as failed without aborting the batch.
    pub async fn reconcile(&self, raw: &RawCampingRecord) -> Result<ReconcileOutcome> {
        let external_id = raw.external_id();
        let classification = classify_pet_policy(raw.pet_policy_text.as_deref().unwrap_or(""));

        let existing = self.campsites.find_by_external_id(&external_id).await?;
        let now = Utc::now().timestamp();

        let (campsite_id, outcome) = match existing {
            Some(current) => {
                // Full overwrite of the mapped field set: fields absent in
                // the raw record become None, never stale.
                let updated =
                    map_campsite(raw, &external_id, current.id.clone(), current.created_at, now);
                self.campsites.update(&updated).await?;
                self.apply_policy(&current.id, &classification).await?;
                (current.id, ReconcileOutcome::Updated)
            }
            None => {
                let campsite =
                    map_campsite(raw, &external_id, Uuid::new_v4().to_string(), now, now);
                self.campsites.insert(&campsite).await?;
                if classification.allowed {
                    self.policies.insert(&new_policy(&campsite.id, &classification)).await?;
                }
                (campsite.id, ReconcileOutcome::Created)
            }
        };

        self.reconcile_facilities(&campsite_id, raw).await?;

        debug!(external_id = %external_id, ?outcome, "record reconciled");
        Ok(outcome)
    }

    /// Overwrite an existing policy row in place; insert one only when the
    /// classification says allowed. A not-allowed record with no existing
    /// row leaves the policy absent.
    async fn apply_policy(
        &self,
        campsite_id: &str,
        classification: &PetPolicyClassification,
    ) -> Result<()> {
        match self.policies.find_by_campsite(campsite_id).await? {
            Some(mut policy) => {
                policy.allowed = classification.allowed;
                policy.size_category = classification.size_category;
                policy.note = classification.note.clone();
                self.policies.update(&policy).await
            }
            None if classification.allowed => {
                self.policies.insert(&new_policy(campsite_id, classification)).await
            }
            None => Ok(()),
        }
    }

    /// Create-tag-if-absent and create-link-if-absent for every facility
    /// named on the record, on both the create and update branches.
    async fn reconcile_facilities(
        &self,
        campsite_id: &str,
        raw: &RawCampingRecord,
    ) -> Result<()> {
        let names =
            parse_facility_list(raw.facility_csv.as_deref(), raw.facility_etc_csv.as_deref());

        for name in names {
            let tag = match self.facilities.find_tag_by_name(&name).await? {
                Some(tag) => tag,
                None => {
                    let tag = FacilityTag { id: Uuid::new_v4().to_string(), name };
                    self.facilities.insert_tag(&tag).await?;
                    tag
                }
            };
            self.facilities.link(campsite_id, &tag.id).await?;
        }

        Ok(())
    }
}

fn new_policy(campsite_id: &str, classification: &PetPolicyClassification) -> PetPolicy {
    PetPolicy {
        id: Uuid::new_v4().to_string(),
        campsite_id: campsite_id.to_string(),
        allowed: classification.allowed,
        size_category: classification.size_category,
        max_pets: None,
        extra_fee: None,
        note: classification.note.clone(),
    }
}

fn map_campsite(
    raw: &RawCampingRecord,
    external_id: &str,
    id: String,
    created_at: i64,
    now: i64,
) -> Campsite {
    let address = match raw.address_detail.as_deref() {
        Some(detail) if !detail.trim().is_empty() => {
            format!("{} {}", raw.address.as_deref().unwrap_or_default(), detail)
                .trim()
                .to_string()
        }
        _ => raw.address.clone().unwrap_or_default(),
    };

    let region = {
        let joined = format!(
            "{} {}",
            raw.province.as_deref().unwrap_or_default(),
            raw.district.as_deref().unwrap_or_default()
        );
        let joined = joined.trim().to_string();
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    };

    Campsite {
        id,
        external_id: external_id.to_string(),
        name: raw.name.clone(),
        address,
        region,
        latitude: raw.map_y.as_deref().and_then(|v| v.parse().ok()),
        longitude: raw.map_x.as_deref().and_then(|v| v.parse().ok()),
        phone: non_empty(raw.phone.as_deref()),
        main_image_url: non_empty(raw.image_url.as_deref()),
        external_url: non_empty(raw.homepage.as_deref()),
        intro: non_empty(raw.intro.as_deref()),
        created_at,
        updated_at: now,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use dogcamp_domain::PetSizeCategory;
    use tokio::sync::Mutex as TokioMutex;

    use super::*;

    #[derive(Default)]
    pub(crate) struct InMemoryStore {
        pub campsites: TokioMutex<HashMap<String, Campsite>>,
        pub policies: TokioMutex<HashMap<String, PetPolicy>>,
        pub tags: TokioMutex<HashMap<String, FacilityTag>>,
        pub links: TokioMutex<Vec<(String, String)>>,
        pub fail_campsite_writes: bool,
    }

    #[async_trait]
    impl CampsiteRepository for InMemoryStore {
        async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Campsite>> {
            let campsites = self.campsites.lock().await;
            Ok(campsites.values().find(|c| c.external_id == external_id).cloned())
        }

        async fn insert(&self, campsite: &Campsite) -> Result<()> {
            if self.fail_campsite_writes {
                return Err(dogcamp_domain::DogCampError::Database(
                    "unique constraint violation".into(),
                ));
            }
            self.campsites.lock().await.insert(campsite.id.clone(), campsite.clone());
            Ok(())
        }

        async fn update(&self, campsite: &Campsite) -> Result<()> {
            if self.fail_campsite_writes {
                return Err(dogcamp_domain::DogCampError::Database("write failed".into()));
            }
            self.campsites.lock().await.insert(campsite.id.clone(), campsite.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl PetPolicyRepository for InMemoryStore {
        async fn find_by_campsite(&self, campsite_id: &str) -> Result<Option<PetPolicy>> {
            let policies = self.policies.lock().await;
            Ok(policies.values().find(|p| p.campsite_id == campsite_id).cloned())
        }

        async fn insert(&self, policy: &PetPolicy) -> Result<()> {
            self.policies.lock().await.insert(policy.id.clone(), policy.clone());
            Ok(())
        }

        async fn update(&self, policy: &PetPolicy) -> Result<()> {
            self.policies.lock().await.insert(policy.id.clone(), policy.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl FacilityRepository for InMemoryStore {
        async fn find_tag_by_name(&self, name: &str) -> Result<Option<FacilityTag>> {
            let tags = self.tags.lock().await;
            Ok(tags.values().find(|t| t.name == name).cloned())
        }

        async fn insert_tag(&self, tag: &FacilityTag) -> Result<()> {
            self.tags.lock().await.insert(tag.id.clone(), tag.clone());
            Ok(())
        }

        async fn link(&self, campsite_id: &str, tag_id: &str) -> Result<()> {
            let mut links = self.links.lock().await;
            let pair = (campsite_id.to_string(), tag_id.to_string());
            if !links.contains(&pair) {
                links.push(pair);
            }
            Ok(())
        }
    }

    pub(crate) fn sample_record(content_id: &str) -> RawCampingRecord {
        RawCampingRecord {
            content_id: content_id.to_string(),
            name: format!("캠핑장 {content_id}"),
            address: Some("강원도 평창군 대관령면 1".to_string()),
            address_detail: None,
            province: Some("강원도".to_string()),
            district: Some("평창군".to_string()),
            map_x: Some("128.7183".to_string()),
            map_y: Some("37.6654".to_string()),
            phone: Some("033-123-4567".to_string()),
            image_url: None,
            homepage: Some("https://example.com".to_string()),
            intro: Some("숲속 캠핑장".to_string()),
            facility_csv: Some("전기,온수".to_string()),
            facility_etc_csv: None,
            pet_policy_text: Some("소형견 가능".to_string()),
        }
    }

    fn reconciler(store: &Arc<InMemoryStore>) -> Reconciler {
        Reconciler::new(store.clone(), store.clone(), store.clone())
    }

    #[tokio::test]
    async fn creates_campsite_policy_and_tags_for_new_record() {
        let store = Arc::new(InMemoryStore::default());
        let outcome = reconciler(&store).reconcile(&sample_record("1001")).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Created);

        let campsites = store.campsites.lock().await;
        assert_eq!(campsites.len(), 1);
        let campsite = campsites.values().next().unwrap();
        assert_eq!(campsite.external_id, "gocamping-1001");
        assert_eq!(campsite.region.as_deref(), Some("강원도 평창군"));
        assert_eq!(campsite.latitude, Some(37.6654));

        let policies = store.policies.lock().await;
        let policy = policies.values().next().unwrap();
        assert!(policy.allowed);
        assert_eq!(policy.size_category, Some(PetSizeCategory::Small));
        assert_eq!(policy.note.as_deref(), Some("소형견 가능"));
        assert_eq!(policy.max_pets, None);

        assert_eq!(store.tags.lock().await.len(), 2);
        assert_eq!(store.links.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn same_native_id_updates_instead_of_duplicating() {
        let store = Arc::new(InMemoryStore::default());
        let reconciler = reconciler(&store);

        reconciler.reconcile(&sample_record("1001")).await.unwrap();

        let mut changed = sample_record("1001");
        changed.name = "이름 변경".to_string();
        changed.phone = None;
        let outcome = reconciler.reconcile(&changed).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Updated);

        let campsites = store.campsites.lock().await;
        assert_eq!(campsites.len(), 1);
        let campsite = campsites.values().next().unwrap();
        assert_eq!(campsite.name, "이름 변경");
        // absent raw fields map to None, never stale
        assert_eq!(campsite.phone, None);
    }

    #[tokio::test]
    async fn not_allowed_record_creates_no_policy_row() {
        let store = Arc::new(InMemoryStore::default());
        let mut record = sample_record("2001");
        record.pet_policy_text = Some("반려동물 불가".to_string());

        reconciler(&store).reconcile(&record).await.unwrap();

        assert!(store.policies.lock().await.is_empty());
    }

    #[tokio::test]
    async fn existing_policy_is_overwritten_when_toggled_off() {
        let store = Arc::new(InMemoryStore::default());
        let reconciler = reconciler(&store);

        reconciler.reconcile(&sample_record("3001")).await.unwrap();
        assert!(store.policies.lock().await.values().next().unwrap().allowed);

        let mut toggled = sample_record("3001");
        toggled.pet_policy_text = Some("애완동물 금지".to_string());
        reconciler.reconcile(&toggled).await.unwrap();

        let policies = store.policies.lock().await;
        assert_eq!(policies.len(), 1);
        let policy = policies.values().next().unwrap();
        assert!(!policy.allowed);
        assert_eq!(policy.size_category, None);
        assert_eq!(policy.note.as_deref(), Some("애완동물 금지"));
    }

    #[tokio::test]
    async fn facility_links_are_idempotent_across_runs() {
        let store = Arc::new(InMemoryStore::default());
        let reconciler = reconciler(&store);

        reconciler.reconcile(&sample_record("4001")).await.unwrap();
        reconciler.reconcile(&sample_record("4001")).await.unwrap();

        assert_eq!(store.tags.lock().await.len(), 2);
        assert_eq!(store.links.lock().await.len(), 2);
    }
}
