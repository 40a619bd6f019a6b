//! Scripted in-memory remote catalog for orchestrator tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dogcamp_core::RemoteCatalog;
use dogcamp_domain::{CatalogEntry, CatalogPage, DogCampError, RawCampingRecord, Result};

/// In-memory catalog serving a fixed corpus page by page.
#[derive(Default)]
pub struct MockCatalog {
    corpus: Vec<CatalogEntry>,
    total_override: Option<i64>,
    fail_on_page: Option<u32>,
    calls: Arc<AtomicU32>,
}

impl MockCatalog {
    /// Catalog over `count` generated records.
    pub fn with_corpus(count: usize) -> Self {
        let corpus = (0..count)
            .map(|i| CatalogEntry::Valid(sample_record(&format!("{}", 1000 + i))))
            .collect();
        Self { corpus, ..Self::default() }
    }

    /// Catalog over explicit records.
    pub fn with_records(records: Vec<RawCampingRecord>) -> Self {
        Self { corpus: records.into_iter().map(CatalogEntry::Valid).collect(), ..Self::default() }
    }

    /// Catalog over explicit positional entries, rejected slots included.
    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { corpus: entries, ..Self::default() }
    }

    /// Report a fixed total count instead of the corpus length.
    pub fn with_total_override(mut self, total: i64) -> Self {
        self.total_override = Some(total);
        self
    }

    /// Fail every fetch of the given page with a network error.
    pub fn with_failure_on_page(mut self, page_no: u32) -> Self {
        self.fail_on_page = Some(page_no);
        self
    }

    /// Number of page fetches issued so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteCatalog for MockCatalog {
    async fn fetch_page(&self, page_no: u32, page_size: u32) -> Result<CatalogPage> {
        if self.fail_on_page == Some(page_no) {
            return Err(DogCampError::Network(format!("connection reset on page {page_no}")));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);

        let start = ((page_no - 1) as usize) * page_size as usize;
        let end = (start + page_size as usize).min(self.corpus.len());
        let items = if start < self.corpus.len() { self.corpus[start..end].to_vec() } else { Vec::new() };

        Ok(CatalogPage {
            items,
            total_count: self.total_override.unwrap_or(self.corpus.len() as i64),
        })
    }
}

/// Generate a plausible catalog record for the given native id.
pub fn sample_record(content_id: &str) -> RawCampingRecord {
    RawCampingRecord {
        content_id: content_id.to_string(),
        name: format!("캠핑장 {content_id}"),
        address: Some("경기도 가평군 설악면 1-2".to_string()),
        address_detail: None,
        province: Some("경기도".to_string()),
        district: Some("가평군".to_string()),
        map_x: Some("127.4958".to_string()),
        map_y: Some("37.6672".to_string()),
        phone: Some("031-555-0100".to_string()),
        image_url: None,
        homepage: None,
        intro: Some("계곡 옆 캠핑장".to_string()),
        facility_csv: Some("전기,온수".to_string()),
        facility_etc_csv: Some("무선인터넷".to_string()),
        pet_policy_text: Some("소형견 가능".to_string()),
    }
}
