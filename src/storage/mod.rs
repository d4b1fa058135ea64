//! Device-local storage.
//!
//! # Responsibilities
//! - Persist the last-saved draft configuration between runs
//! - Persist the last-selected language
//!
//! # Design Decisions
//! - One value per key; the value is plain text (JSON for the draft)
//! - A broken draft is logged and ignored, never fatal

pub mod file;
pub mod memory;

use thiserror::Error;

use crate::site::{Language, SiteConfig};

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key holding the draft `SiteConfig` as JSON text.
pub const DRAFT_KEY: &str = "site_config_draft";

/// Key holding the language code.
pub const LANGUAGE_KEY: &str = "language";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("failed to encode draft: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A key/value store living on the user's device.
pub trait DeviceStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read the cached draft. Unreadable or malformed drafts yield `None`.
pub fn load_draft(storage: &dyn DeviceStorage) -> Option<SiteConfig> {
    let text = match storage.get(DRAFT_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cached draft");
            return None;
        }
    };
    match SiteConfig::from_json(&text) {
        Ok(draft) => Some(draft),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed cached draft");
            None
        }
    }
}

pub fn save_draft(storage: &dyn DeviceStorage, config: &SiteConfig) -> Result<(), StorageError> {
    let text = serde_json::to_string(config)?;
    storage.set(DRAFT_KEY, &text)?;
    tracing::debug!(bytes = text.len(), "Draft saved");
    Ok(())
}

pub fn clear_draft(storage: &dyn DeviceStorage) -> Result<(), StorageError> {
    storage.remove(DRAFT_KEY)
}

/// Read the persisted language; unknown codes fall back to the default.
pub fn load_language(storage: &dyn DeviceStorage) -> Language {
    match storage.get(LANGUAGE_KEY) {
        Ok(Some(code)) => code.parse().unwrap_or_else(|_| {
            tracing::warn!(code = %code, "Unknown stored language, using default");
            Language::default()
        }),
        Ok(None) => Language::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored language");
            Language::default()
        }
    }
}

pub fn save_language(storage: &dyn DeviceStorage, lang: Language) -> Result<(), StorageError> {
    storage.set(LANGUAGE_KEY, lang.code())
}
