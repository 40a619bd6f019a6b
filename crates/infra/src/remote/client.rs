//! GoCamping open-data API client.
//!
//! One HTTP GET per catalog page, no automatic retry: a failed call ends
//! the current run and the persisted cursor resumes from the last
//! committed batch on the next invocation.

use std::time::Duration;

use async_trait::async_trait;
use dogcamp_core::RemoteCatalog;
use dogcamp_domain::constants::{CLIENT_APP, CLIENT_OS, DEFAULT_BASE_URL, RESULT_CODE_OK};
use dogcamp_domain::{CatalogEntry, CatalogPage, DogCampError, Result};
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use super::errors::SyncError;
use super::types::CatalogEnvelope;
use crate::errors::InfraError;

/// Configuration for the GoCamping client.
#[derive(Debug, Clone)]
pub struct GoCampingClientConfig {
    /// Base URL of the catalog API.
    pub base_url: String,
    /// Service key issued by the open-data portal.
    pub api_key: String,
    /// Timeout applied to each page request.
    pub timeout: Duration,
}

impl Default for GoCampingClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP implementation of the remote catalog port.
pub struct GoCampingClient {
    http: reqwest::Client,
    config: GoCampingClientConfig,
}

impl GoCampingClient {
    /// Create a new client.
    ///
    /// Fails fast on a missing API key so a misconfigured deployment never
    /// reaches the point of mutating feed state.
    pub fn new(config: GoCampingClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(DogCampError::Config("GoCamping API key is not set".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(InfraError::from)?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl RemoteCatalog for GoCampingClient {
    #[instrument(skip(self))]
    async fn fetch_page(&self, page_no: u32, page_size: u32) -> Result<CatalogPage> {
        let url = format!("{}/basedList", self.config.base_url.trim_end_matches('/'));
        let query = [
            ("serviceKey", self.config.api_key.clone()),
            ("MobileOS", CLIENT_OS.to_string()),
            ("MobileApp", CLIENT_APP.to_string()),
            ("_type", "json".to_string()),
            ("pageNo", page_no.to_string()),
            ("numOfRows", page_size.to_string()),
        ];

        let request = self.http.get(&url).query(&query);

        let response = tokio::time::timeout(self.config.timeout, request.send())
            .await
            .map_err(|_| SyncError::Timeout(self.config.timeout))?
            .map_err(InfraError::from)?;

        let status = response.status();
        if !status.is_success() {
            let err = classify_status(status);
            warn!(%status, category = ?err.category(), page_no, "catalog request failed");
            return Err(err.into());
        }

        let envelope: CatalogEnvelope = response
            .json()
            .await
            .map_err(|err| DogCampError::RemoteApi(format!("malformed catalog envelope: {err}")))?;

        let header = &envelope.response.header;
        if header.result_code != RESULT_CODE_OK {
            return Err(DogCampError::RemoteApi(format!(
                "catalog error {}: {}",
                header.result_code, header.result_msg
            )));
        }

        let body = envelope.response.body.unwrap_or_default();
        // Invalid items stay in the stream as rejected slots so page
        // positions keep lining up with the remote totalCount.
        let items: Vec<CatalogEntry> =
            body.items.item.into_iter().map(super::types::CatalogItem::into_entry).collect();

        let rejected = items.iter().filter(|entry| entry.record().is_none()).count();
        if rejected > 0 {
            warn!(rejected, page_no, "page items missing content id or name");
        }

        let total_count =
            if body.total_count > 0 { body.total_count } else { items.len() as i64 };

        debug!(page_no, fetched = items.len(), total_count, "catalog page fetched");

        Ok(CatalogPage { items, total_count })
    }
}

fn classify_status(status: StatusCode) -> SyncError {
    let message = format!("HTTP {status}");
    match status.as_u16() {
        401 | 403 => SyncError::Auth(message),
        429 => SyncError::RateLimit(message),
        500..=599 => SyncError::Server(message),
        _ => SyncError::Client(message),
    }
}
