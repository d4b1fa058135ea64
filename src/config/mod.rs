//! Tool settings for the site-sync client.
//!
//! # Data Flow
//! ```text
//! site-sync.toml
//!     → loader.rs (read, parse, env overrides)
//!     → validation.rs (semantic checks)
//!     → SyncConfig (validated, immutable)
//!     → handed to remote client, loader and logging
//! ```
//!
//! These are the settings of the tool itself (backend address, storage
//! location). The site configuration document it synchronizes lives in
//! [`crate::site`].

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError, TOKEN_ENV};
pub use schema::{BackendConfig, BaselineConfig, ObservabilityConfig, StorageConfig, SyncConfig};
