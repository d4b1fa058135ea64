//! Configuration loader.
//!
//! # Responsibilities
//! - Merge baseline, cached draft and remote page records
//! - Isolate per-page failures
//! - Derive the presentation state from the merged document

use std::sync::Arc;

use futures_util::future::join_all;
use thiserror::Error;

use crate::observability::metrics;
use crate::remote::StaticStore;
use crate::site::merge::{decode_attributes, merge_draft, merge_remote_page};
use crate::site::{PageKey, Presentation, SiteConfig};
use crate::storage::{self, DeviceStorage};
use crate::store::SiteStore;
use crate::sync::baseline::{BaselineError, BaselineSource};
use crate::sync::liveness::Liveness;

#[derive(Debug, Error)]
pub enum LoadError {
    /// The baseline could not be read; nothing to merge onto.
    #[error(transparent)]
    Baseline(#[from] BaselineError),

    /// The consumer went away before the load finished.
    #[error("load abandoned before results were applied")]
    Abandoned,
}

/// What happened to one page during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLoad {
    /// Remote attributes merged into the page.
    Merged,
    /// The remote payload was not an object; previous layer kept.
    Skipped,
    /// The fetch failed; previous layer kept.
    Failed(String),
}

impl PageLoad {
    pub fn label(&self) -> &'static str {
        match self {
            PageLoad::Merged => "merged",
            PageLoad::Skipped => "skipped",
            PageLoad::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub config: SiteConfig,
    pub presentation: Presentation,
    pub pages: Vec<(PageKey, PageLoad)>,
}

impl LoadReport {
    pub fn failed_pages(&self) -> Vec<PageKey> {
        self.pages
            .iter()
            .filter(|(_, outcome)| matches!(outcome, PageLoad::Failed(_)))
            .map(|(page, _)| *page)
            .collect()
    }
}

pub struct ConfigLoader {
    remote: Arc<dyn StaticStore>,
    storage: Arc<dyn DeviceStorage>,
    timeout_secs: u64,
}

impl ConfigLoader {
    pub fn new(
        remote: Arc<dyn StaticStore>,
        storage: Arc<dyn DeviceStorage>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            remote,
            storage,
            timeout_secs,
        }
    }

    /// Assemble the configuration from all three layers.
    pub async fn load(&self, baseline: &BaselineSource) -> Result<LoadReport, LoadError> {
        let mut config = baseline.fetch(self.timeout_secs).await?;
        tracing::debug!(keys = config.root().len(), "Baseline loaded");

        if let Some(draft) = storage::load_draft(self.storage.as_ref()) {
            tracing::debug!(keys = draft.root().len(), "Overlaying cached draft");
            merge_draft(&mut config, draft);
        }

        let fetches = PageKey::ALL.into_iter().map(|page| {
            let remote = Arc::clone(&self.remote);
            async move { (page, remote.fetch_page(page).await) }
        });

        let mut pages = Vec::with_capacity(PageKey::ALL.len());
        for (page, result) in join_all(fetches).await {
            let outcome = match result {
                Ok(raw) => match decode_attributes(raw) {
                    Some(attributes) => {
                        merge_remote_page(&mut config, page, attributes);
                        PageLoad::Merged
                    }
                    None => {
                        tracing::debug!(
                            page = %page,
                            "Remote attributes are not an object, skipping"
                        );
                        PageLoad::Skipped
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        page = %page,
                        error = %e,
                        "Failed to load page, keeping previous layer"
                    );
                    PageLoad::Failed(e.to_string())
                }
            };
            metrics::record_page_load(page.as_str(), outcome.label());
            pages.push((page, outcome));
        }

        let presentation = Presentation::from_config(&config);
        tracing::info!(
            merged = pages.iter().filter(|(_, o)| *o == PageLoad::Merged).count(),
            total = pages.len(),
            "Site configuration loaded"
        );

        Ok(LoadReport {
            config,
            presentation,
            pages,
        })
    }

    /// Load and install the result into `store`, unless `liveness` closed meanwhile.
    pub async fn load_into(
        &self,
        baseline: &BaselineSource,
        store: &SiteStore,
        liveness: &Liveness,
    ) -> Result<LoadReport, LoadError> {
        let report = self.load(baseline).await?;
        Self::install(report, store, liveness)
    }

    /// Like [`load_into`](Self::load_into), but the cached draft is applied
    /// again on top of the remote layer.
    ///
    /// The draft then holds unpublished edits from an earlier session, and
    /// those outrank what the remote store still has until they are published.
    pub async fn resume_into(
        &self,
        baseline: &BaselineSource,
        store: &SiteStore,
        liveness: &Liveness,
    ) -> Result<LoadReport, LoadError> {
        let mut report = self.load(baseline).await?;
        if let Some(draft) = storage::load_draft(self.storage.as_ref()) {
            tracing::debug!(
                keys = draft.root().len(),
                "Re-applying pending draft over remote pages"
            );
            merge_draft(&mut report.config, draft);
            report.presentation = Presentation::from_config(&report.config);
        }
        Self::install(report, store, liveness)
    }

    fn install(
        report: LoadReport,
        store: &SiteStore,
        liveness: &Liveness,
    ) -> Result<LoadReport, LoadError> {
        if !liveness.is_live() {
            tracing::debug!("Load finished after consumer closed, discarding");
            return Err(LoadError::Abandoned);
        }
        store.replace_with(report.config.clone(), Some(report.presentation.clone()));
        Ok(report)
    }
}
