//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! sync engine.

// Remote catalog paging
pub const REMOTE_PAGE_SIZE: u32 = 100;
pub const DEFAULT_BATCH_SIZE: u32 = 100;
pub const INTER_PAGE_DELAY_MS: u64 = 100;

// Daily call budget applied when a feed row is first created
pub const DEFAULT_DAILY_CALL_BUDGET: i64 = 1000;

// Remote API contract
pub const DEFAULT_BASE_URL: &str = "https://apis.data.go.kr/B551011/GoCamping";
pub const RESULT_CODE_OK: &str = "0000";
pub const CLIENT_OS: &str = "ETC";
pub const CLIENT_APP: &str = "dogcamp";

// Identity of the GoCamping feed and the external-id namespace it owns
pub const GOCAMPING_FEED_NAME: &str = "gocamping";
pub const EXTERNAL_ID_PREFIX: &str = "gocamping";

// SyncRun messages are truncated to keep audit rows bounded
pub const MAX_RUN_MESSAGE_LEN: usize = 256;
