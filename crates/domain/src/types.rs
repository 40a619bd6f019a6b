//! Common data types used throughout the sync engine

use serde::{Deserialize, Serialize};

use crate::constants::EXTERNAL_ID_PREFIX;

/// A campsite imported from a remote catalog.
///
/// `external_id` is the sole idempotency key: the same remote record always
/// resolves to the same local row no matter how many times sync runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campsite {
    pub id: String,
    pub external_id: String,
    pub name: String,
    pub address: String,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub main_image_url: Option<String>,
    pub external_url: Option<String>,
    pub intro: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Dog size restriction parsed out of a pet-policy string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetSizeCategory {
    Small,
    Medium,
    Large,
}

impl PetSizeCategory {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "SMALL",
            Self::Medium => "MEDIUM",
            Self::Large => "LARGE",
        }
    }

    /// Parse the storage representation back into the enum.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SMALL" => Some(Self::Small),
            "MEDIUM" => Some(Self::Medium),
            "LARGE" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Pet policy for a campsite (one-to-one with [`Campsite`]).
///
/// `note` always retains the full original source string for auditability,
/// regardless of what the classifier made of it. `max_pets` and `extra_fee`
/// are not derivable from the feed and stay `None` on import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetPolicy {
    pub id: String,
    pub campsite_id: String,
    pub allowed: bool,
    pub size_category: Option<PetSizeCategory>,
    pub max_pets: Option<i64>,
    pub extra_fee: Option<i64>,
    pub note: Option<String>,
}

/// A deduplicated facility tag ("전기", "온수", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityTag {
    pub id: String,
    pub name: String,
}

/// One remote data source being synchronized.
///
/// `cursor` is the durable 0-based offset into the logical remote corpus
/// marking the next unprocessed record. It may lag `total_count` if the
/// remote corpus shrinks between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFeed {
    pub id: String,
    pub name: String,
    pub base_url: String,
    pub enabled: bool,
    pub cursor: i64,
    pub daily_call_budget: i64,
    pub calls_used_today: i64,
    pub last_call_date: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Terminal and in-flight states of a sync run audit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncRunStatus {
    Running,
    Success,
    Failed,
}

impl SyncRunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "RUNNING" => Some(Self::Running),
            "SUCCESS" => Some(Self::Success),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Audit log row: one per orchestrator invocation.
///
/// Created `Running` at invocation start and moved to a terminal status
/// exactly once, including on the crash path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRun {
    pub id: String,
    pub feed_id: String,
    pub status: SyncRunStatus,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub items_processed: i64,
    pub items_created: i64,
    pub items_updated: i64,
    pub items_failed: i64,
    pub message: Option<String>,
}

/// A validated remote catalog record.
///
/// Raw page items are validated at the paginator boundary; records reaching
/// the reconciler always carry a native id and a name. Everything else is
/// optional free text exactly as the upstream API returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCampingRecord {
    pub content_id: String,
    pub name: String,
    pub address: Option<String>,
    pub address_detail: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub map_x: Option<String>,
    pub map_y: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub homepage: Option<String>,
    pub intro: Option<String>,
    pub facility_csv: Option<String>,
    pub facility_etc_csv: Option<String>,
    pub pet_policy_text: Option<String>,
}

impl RawCampingRecord {
    /// Deterministic external id for this record's native id.
    pub fn external_id(&self) -> String {
        external_id_for(&self.content_id)
    }
}

/// Derive the stable external id for a native catalog id.
pub fn external_id_for(content_id: &str) -> String {
    format!("{EXTERNAL_ID_PREFIX}-{content_id}")
}

/// One positional slot of a remote catalog page.
///
/// Items failing boundary validation stay in the stream as `Rejected` so
/// logical corpus indices keep matching the remote `totalCount`; the
/// orchestrator tallies them as failed instead of skipping over them.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntry {
    Valid(RawCampingRecord),
    Rejected { content_id: Option<String> },
}

impl CatalogEntry {
    /// The validated record, if this slot holds one.
    pub fn record(&self) -> Option<&RawCampingRecord> {
        match self {
            Self::Valid(record) => Some(record),
            Self::Rejected { .. } => None,
        }
    }
}

/// One logical page fetched from the remote catalog, one entry per
/// upstream item.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<CatalogEntry>,
    pub total_count: i64,
}

/// Structured result returned to the caller of a sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub success: bool,
    pub items_processed: i64,
    pub items_created: i64,
    pub items_updated: i64,
    pub items_failed: i64,
    pub last_processed_index: i64,
    pub total_count: i64,
    pub is_complete: bool,
    pub calls_used: i64,
    pub calls_remaining: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_id_is_deterministic() {
        assert_eq!(external_id_for("100000"), "gocamping-100000");
        assert_eq!(external_id_for("100000"), external_id_for("100000"));
    }

    #[test]
    fn sync_run_status_round_trips() {
        for status in [SyncRunStatus::Running, SyncRunStatus::Success, SyncRunStatus::Failed] {
            assert_eq!(SyncRunStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SyncRunStatus::parse("PENDING"), None);
    }

    #[test]
    fn size_category_round_trips() {
        for category in
            [PetSizeCategory::Small, PetSizeCategory::Medium, PetSizeCategory::Large]
        {
            assert_eq!(PetSizeCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(PetSizeCategory::parse("HUGE"), None);
    }
}
