//! Sync-specific error types
//!
//! Provides error classification for remote catalog calls. There is no
//! in-run retry: a failed call ends the run and the persisted cursor
//! resumes it later, so the categories feed logging and the domain error
//! mapping only.

use dogcamp_domain::DogCampError;
use thiserror::Error;

/// Categories of sync errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorCategory {
    /// Authentication errors (401, 403)
    Authentication,
    /// Rate limiting errors (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (4xx except auth)
    Client,
    /// Network/connection errors
    Network,
    /// Database errors
    Database,
    /// Configuration errors
    Config,
}

/// Sync operation errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(std::time::Duration),
}

impl SyncError {
    /// Get the error category for this error
    pub fn category(&self) -> SyncErrorCategory {
        match self {
            Self::Auth(_) => SyncErrorCategory::Authentication,
            Self::RateLimit(_) => SyncErrorCategory::RateLimit,
            Self::Server(_) => SyncErrorCategory::Server,
            Self::Client(_) => SyncErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => SyncErrorCategory::Network,
            Self::Database(_) => SyncErrorCategory::Database,
            Self::Config(_) => SyncErrorCategory::Config,
        }
    }
}

impl From<SyncError> for DogCampError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Auth(message) | SyncError::Client(message) => Self::RemoteApi(message),
            SyncError::RateLimit(message)
            | SyncError::Server(message)
            | SyncError::Network(message) => Self::Network(message),
            SyncError::Database(message) => Self::Database(message),
            SyncError::Config(message) => Self::Config(message),
            SyncError::Timeout(duration) => {
                Self::Network(format!("request timed out after {duration:?}"))
            }
        }
    }
}
