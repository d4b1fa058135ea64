//! Publisher: writes the configuration back, one record per page.
//!
//! # Responsibilities
//! - Upsert every page key (update, falling back to create)
//! - Report full, partial or failed publishes
//! - Adopt the published document as canonical only on full success

use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::{Map, Value};

use crate::observability::metrics;
use crate::remote::{RemoteError, StaticStore};
use crate::site::{PageKey, SiteConfig};
use crate::storage::{self, DeviceStorage};
use crate::store::SiteStore;
use crate::sync::liveness::Liveness;

/// Result of writing one page.
#[derive(Debug)]
pub enum UpsertOutcome {
    /// The existing record was updated.
    Updated,
    /// Update failed; a new record was created.
    Created,
    /// Both calls failed.
    Failed { update: RemoteError, create: RemoteError },
}

impl UpsertOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, UpsertOutcome::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpsertOutcome::Updated => "updated",
            UpsertOutcome::Created => "created",
            UpsertOutcome::Failed { .. } => "failed",
        }
    }
}

/// Update the page record; if that fails, create it.
pub async fn upsert_page(
    remote: &dyn StaticStore,
    page: PageKey,
    attributes: &Map<String, Value>,
) -> UpsertOutcome {
    let update = match remote.update_page(page, attributes).await {
        Ok(()) => return UpsertOutcome::Updated,
        Err(e) => e,
    };
    tracing::debug!(page = %page, error = %update, "Update failed, trying create");

    match remote.create_page(page, attributes).await {
        Ok(()) => UpsertOutcome::Created,
        Err(create) => UpsertOutcome::Failed { update, create },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Every page written; canonical config advanced.
    Full,
    /// Some pages written; canonical config not advanced.
    Partial,
    /// Nothing written.
    Failed,
}

#[derive(Debug)]
pub struct PublishReport {
    pub outcome: PublishOutcome,
    pub succeeded: usize,
    pub attempted: usize,
    pub pages: Vec<(PageKey, UpsertOutcome)>,
}

impl PublishReport {
    fn from_pages(pages: Vec<(PageKey, UpsertOutcome)>) -> Self {
        let attempted = pages.len();
        let succeeded = pages.iter().filter(|(_, o)| o.is_success()).count();
        let outcome = if succeeded == attempted {
            PublishOutcome::Full
        } else if succeeded > 0 {
            PublishOutcome::Partial
        } else {
            PublishOutcome::Failed
        };
        Self {
            outcome,
            succeeded,
            attempted,
            pages,
        }
    }

    pub fn failed_pages(&self) -> Vec<PageKey> {
        self.pages
            .iter()
            .filter(|(_, o)| !o.is_success())
            .map(|(page, _)| *page)
            .collect()
    }
}

pub struct Publisher {
    remote: Arc<dyn StaticStore>,
    storage: Arc<dyn DeviceStorage>,
}

impl Publisher {
    pub fn new(remote: Arc<dyn StaticStore>, storage: Arc<dyn DeviceStorage>) -> Self {
        Self { remote, storage }
    }

    /// Publish the store's canonical document.
    pub async fn publish_canonical(&self, store: &SiteStore, liveness: &Liveness) -> PublishReport {
        let config = (*store.snapshot()).clone();
        self.publish(store, config, liveness).await
    }

    /// Publish `config`; adopt it into `store` and the draft only if every page succeeded.
    ///
    /// Pages written before a partial failure are not rolled back remotely.
    pub async fn publish(
        &self,
        store: &SiteStore,
        config: SiteConfig,
        liveness: &Liveness,
    ) -> PublishReport {
        let upserts = PageKey::ALL.into_iter().map(|page| {
            let remote = Arc::clone(&self.remote);
            let attributes = config.page_or_empty(page);
            async move {
                let outcome = upsert_page(remote.as_ref(), page, &attributes).await;
                metrics::record_publish(page.as_str(), outcome.label());
                if let UpsertOutcome::Failed { update, create } = &outcome {
                    tracing::warn!(
                        page = %page,
                        update_error = %update,
                        create_error = %create,
                        "Failed to publish page"
                    );
                }
                (page, outcome)
            }
        });

        let report = PublishReport::from_pages(join_all(upserts).await);
        tracing::info!(
            outcome = ?report.outcome,
            succeeded = report.succeeded,
            attempted = report.attempted,
            "Publish finished"
        );

        if report.outcome != PublishOutcome::Full {
            return report;
        }
        if !liveness.is_live() {
            tracing::debug!("Publish finished after consumer closed, not adopting");
            return report;
        }

        if let Err(e) = storage::save_draft(self.storage.as_ref(), &config) {
            tracing::warn!(error = %e, "Published, but failed to cache draft");
        }
        store.replace(config);
        report
    }
}
