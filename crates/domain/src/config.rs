//! Configuration structures for the sync engine.
//!
//! Loading (env vars, file probing) lives in the infra layer; the domain
//! only defines the shapes.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_DAILY_CALL_BUDGET, INTER_PAGE_DELAY_MS,
    REMOTE_PAGE_SIZE,
};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
}

/// Local store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Remote catalog endpoint configuration.
///
/// `api_key` has no usable default; a missing key fails fast before any
/// state mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Tunables for the batch loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_daily_call_budget")]
    pub daily_call_budget: i64,
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_inter_page_delay_ms")]
    pub inter_page_delay_ms: u64,
    /// Cap on batches per run; `None` runs to corpus or budget exhaustion.
    #[serde(default)]
    pub max_batches: Option<u32>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            daily_call_budget: DEFAULT_DAILY_CALL_BUDGET,
            batch_size: DEFAULT_BATCH_SIZE,
            page_size: REMOTE_PAGE_SIZE,
            inter_page_delay_ms: INTER_PAGE_DELAY_MS,
            max_batches: None,
        }
    }
}

fn default_pool_size() -> u32 {
    5
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_daily_call_budget() -> i64 {
    DEFAULT_DAILY_CALL_BUDGET
}

fn default_batch_size() -> u32 {
    DEFAULT_BATCH_SIZE
}

fn default_page_size() -> u32 {
    REMOTE_PAGE_SIZE
}

fn default_inter_page_delay_ms() -> u64 {
    INTER_PAGE_DELAY_MS
}
