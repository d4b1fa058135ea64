//! Settings schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file and
//! every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root settings for the site-sync client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SyncConfig {
    /// Remote REST backend.
    pub backend: BackendConfig,

    /// Where the baseline document comes from.
    pub baseline: BaselineConfig,

    /// Device-local storage for the draft and language.
    pub storage: StorageConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Remote backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// API base URL (e.g., "https://api.example.com/api").
    pub base_url: String,

    /// Domain prefixed to relative image paths.
    pub image_domain: String,

    /// Bearer token. Overridden by `SITE_SYNC_TOKEN` when set.
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            image_domain: "http://localhost:8000".to_string(),
            token: None,
            request_timeout_secs: 15,
        }
    }
}

/// Baseline document location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Local file path or `http(s)` URL of the baseline JSON.
    pub source: String,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            source: "config.json".to_string(),
        }
    }
}

/// Device-local storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one file per storage key.
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: ".site-sync".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Output format: "pretty" or "json".
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}
