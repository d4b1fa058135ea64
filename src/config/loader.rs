//! Settings loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::SyncConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `backend.token`.
pub const TOKEN_ENV: &str = "SITE_SYNC_TOKEN";

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate settings from a TOML file.
pub fn load_config(path: &Path) -> Result<SyncConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, std::env::var(TOKEN_ENV).ok())
}

/// Parse settings text, apply the token override and validate.
pub fn parse_config(
    content: &str,
    token_override: Option<String>,
) -> Result<SyncConfig, ConfigError> {
    let mut config: SyncConfig = toml::from_str(content)?;

    if let Some(token) = token_override.filter(|t| !t.is_empty()) {
        config.backend.token = Some(token);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
