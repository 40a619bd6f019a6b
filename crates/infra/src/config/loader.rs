//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables (`.env` honored)
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `DOGCAMP_DB_PATH`: Database file path (required)
//! - `DOGCAMP_DB_POOL_SIZE`: Connection pool size
//! - `DOGCAMP_API_KEY`: GoCamping service key (required)
//! - `DOGCAMP_API_ENDPOINT`: Catalog base URL
//! - `DOGCAMP_DAILY_CALL_BUDGET`: Daily remote call budget

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use dogcamp_domain::constants::DEFAULT_BASE_URL;
use dogcamp_domain::{
    Config, DatabaseConfig, DogCampError, RemoteConfig, Result, SyncConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `DogCampError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    // Pick up a local .env before reading the environment.
    dotenvy::dotenv().ok();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `DOGCAMP_DB_PATH` and `DOGCAMP_API_KEY` must be present; everything else
/// falls back to its default.
///
/// # Errors
/// Returns `DogCampError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("DOGCAMP_DB_PATH")?;
    let api_key = env_var("DOGCAMP_API_KEY")?;
    let base_url =
        std::env::var("DOGCAMP_API_ENDPOINT").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let defaults = SyncConfig::default();
    let sync = SyncConfig {
        daily_call_budget: env_parse("DOGCAMP_DAILY_CALL_BUDGET", defaults.daily_call_budget)?,
        ..defaults
    };

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size: env_parse("DOGCAMP_DB_POOL_SIZE", 5)? },
        remote: RemoteConfig { api_key, base_url },
        sync,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `DogCampError::Config` if no file is found or parsing fails.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DogCampError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DogCampError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DogCampError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format detected by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DogCampError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DogCampError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(DogCampError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory, up to two parent directories, and the
/// executable's directory for `config.{json,toml}` or `dogcamp.{json,toml}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("dogcamp.json"),
            cwd.join("dogcamp.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("dogcamp.json"),
                exe_dir.join("dogcamp.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| DogCampError::Config(format!("Missing required environment variable: {}", key)))
}

/// Parse an optional environment variable, falling back to `default`.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| DogCampError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
