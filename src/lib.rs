//! Met-Harvest: a polite batch fetcher for museum collection records
//!
//! This crate discovers the object ids of a museum collection API, fetches each
//! object's metadata in rate-limited batches, enriches it with fields scraped
//! from the object's public detail page, and writes the surviving records to a
//! single JSON document.

pub mod config;
pub mod fetcher;
pub mod output;
pub mod record;
pub mod state;

use thiserror::Error;

/// Main error type for Met-Harvest runs
///
/// Only run-level failures are represented here. Per-item failures are
/// absorbed by the item fetcher and surface as [`state::DropReason`]s.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to discover object ids from {url}: {reason}")]
    Discovery { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Failed to encode results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    /// Process exit status for this failure: 2 for discovery, 3 for config, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Discovery { .. } => 2,
            Self::Config(_) => 3,
            _ => 1,
        }
    }
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

/// Result type alias for Met-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{EnrichedRecord, ObjectId, RawRecord, ResultCollection};
pub use state::{DropReason, FetchFailure, ItemOutcome};
