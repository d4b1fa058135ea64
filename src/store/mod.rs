//! Canonical site configuration store.
//!
//! # Responsibilities
//! - Hold the canonical `SiteConfig` and derived `Presentation`
//! - Apply typed, page-scoped update actions
//! - Hand out cheap snapshots to readers
//!
//! # Design Decisions
//! - `ArcSwap` so readers never block and replacement is atomic
//! - A single editing session writes at a time; last writer wins

pub mod actions;

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::Value;

use crate::site::{Presentation, SiteConfig};

pub use actions::{ActionError, StoreAction};

pub struct SiteStore {
    config: ArcSwap<SiteConfig>,
    presentation: ArcSwap<Presentation>,
}

impl SiteStore {
    pub fn new(config: SiteConfig) -> Self {
        let presentation = Presentation::from_config(&config);
        Self {
            config: ArcSwap::from_pointee(config),
            presentation: ArcSwap::from_pointee(presentation),
        }
    }

    pub fn snapshot(&self) -> Arc<SiteConfig> {
        self.config.load_full()
    }

    pub fn presentation(&self) -> Arc<Presentation> {
        self.presentation.load_full()
    }

    /// Replace the canonical document wholesale.
    pub fn replace(&self, config: SiteConfig) {
        self.replace_with(config, None);
    }

    /// Replace the document and install an already-derived presentation.
    pub fn replace_with(&self, config: SiteConfig, presentation: Option<Presentation>) {
        let presentation = presentation.unwrap_or_else(|| Presentation::from_config(&config));
        self.config.store(Arc::new(config));
        self.presentation.store(Arc::new(presentation));
    }

    /// Apply one action to the canonical document.
    pub fn apply(&self, action: &StoreAction) -> Result<Option<Value>, ActionError> {
        let mut next = (*self.config.load_full()).clone();
        let displaced = action.apply_to(&mut next)?;
        tracing::debug!(page = %action.page(), "Applied store action");
        self.config.store(Arc::new(next));
        Ok(displaced)
    }
}

impl Default for SiteStore {
    fn default() -> Self {
        Self::new(SiteConfig::new())
    }
}
