//! Rating-Harvest: an incremental rating harvester for a ranked catalog
//!
//! This crate walks a remote site's popularity-ranked listing page by page,
//! resolves a stable cross-reference identifier for each item, and appends
//! dated rating observations to durable per-item record files. Runs are
//! bounded by a wall-clock budget and resume from a persisted page cursor,
//! so a harvest survives restarts, rate limits, and time-box expiry without
//! losing progress or corrupting state.

pub mod config;
pub mod harvest;
pub mod output;
pub mod store;

use thiserror::Error;

/// Main error type for harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Fetch-layer errors
///
/// A single logical request is retried internally; only the final outcome
/// surfaces here. Any HTTP status other than 403 counts as an answer, not
/// an error, and is returned to the caller to interpret.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("{url} still blocked after {attempts} attempts")]
    Blocked { url: String, attempts: u32 },

    #[error("{url} unavailable after {attempts} attempts: {reason}")]
    Unavailable {
        url: String,
        attempts: u32,
        reason: String,
    },
}

/// Record-store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record '{key}': {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },
}

/// Result type alias for harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{FetchClient, HarvestEvent, RunDriver, RunSummary, StopCause};
pub use store::{Checkpoint, ItemRecord, Observation, RecordStore};
