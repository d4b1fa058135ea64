//! Baseline document source.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::site::{SiteConfig, SiteError};

/// Errors fetching the baseline. These abort the load.
#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("failed to read baseline {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to fetch baseline: {0}")]
    Http(#[from] reqwest::Error),

    #[error("baseline request returned {0}")]
    Status(reqwest::StatusCode),

    #[error("baseline request timed out after {0} seconds")]
    Timeout(u64),

    #[error("invalid baseline document: {0}")]
    Document(#[from] SiteError),
}

/// Where the lowest-precedence layer comes from.
#[derive(Debug, Clone)]
pub enum BaselineSource {
    File(PathBuf),
    Url(Url),
    /// An in-memory document.
    Document(SiteConfig),
}

impl BaselineSource {
    /// `http(s)://` values become URLs; anything else is a file path.
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            if let Ok(url) = Url::parse(source) {
                return BaselineSource::Url(url);
            }
        }
        BaselineSource::File(PathBuf::from(source))
    }

    pub async fn fetch(&self, timeout_secs: u64) -> Result<SiteConfig, BaselineError> {
        match self {
            BaselineSource::File(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| BaselineError::Io {
                        path: path.clone(),
                        source,
                    })?;
                Ok(SiteConfig::from_json(&text)?)
            }
            BaselineSource::Url(url) => {
                let request = async {
                    let response = reqwest::get(url.clone()).await?;
                    if !response.status().is_success() {
                        return Err(BaselineError::Status(response.status()));
                    }
                    Ok::<_, BaselineError>(response.text().await?)
                };
                let text = tokio::time::timeout(Duration::from_secs(timeout_secs), request)
                    .await
                    .map_err(|_| BaselineError::Timeout(timeout_secs))??;
                Ok(SiteConfig::from_json(&text)?)
            }
            BaselineSource::Document(config) => Ok(config.clone()),
        }
    }
}
