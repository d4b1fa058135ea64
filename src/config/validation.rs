//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and URL syntax
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: SyncConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::SyncConfig;

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.base_url '{0}' is not a valid URL")]
    InvalidBaseUrl(String),

    #[error("backend.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("baseline.source must not be empty")]
    EmptyBaseline,

    #[error("storage.dir must not be empty")]
    EmptyStorageDir,

    #[error("observability.log_format '{0}' must be 'pretty' or 'json'")]
    UnknownLogFormat(String),
}

/// Validate settings, collecting every problem found.
pub fn validate_config(config: &SyncConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.backend.base_url).is_err() {
        errors.push(ValidationError::InvalidBaseUrl(config.backend.base_url.clone()));
    }
    if config.backend.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.baseline.source.trim().is_empty() {
        errors.push(ValidationError::EmptyBaseline);
    }
    if config.storage.dir.trim().is_empty() {
        errors.push(ValidationError::EmptyStorageDir);
    }
    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::UnknownLogFormat(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
