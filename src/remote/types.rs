//! Wire types and error definitions for the REST backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::site::ImageRef;

/// Errors that can occur talking to the backend.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection failed or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// The response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// `GET /static` response; some deployments wrap it in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StaticResponse {
    Direct { attributes: Value },
    Wrapped { data: StaticRecord },
}

#[derive(Debug, Deserialize)]
pub(crate) struct StaticRecord {
    pub attributes: Value,
}

impl StaticResponse {
    pub fn into_attributes(self) -> Value {
        match self {
            StaticResponse::Direct { attributes } => attributes,
            StaticResponse::Wrapped { data } => data.attributes,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateStaticBody<'a> {
    pub attributes: &'a Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddStaticBody<'a> {
    pub title: &'a str,
    pub attributes: &'a Map<String, Value>,
}

/// `POST /image` response, bare or wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UploadResponse {
    Direct(UploadedImage),
    Wrapped { data: UploadedImage },
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadedImage {
    pub id: u64,
    pub url: String,
}

impl From<UploadResponse> for ImageRef {
    fn from(resp: UploadResponse) -> Self {
        let image = match resp {
            UploadResponse::Direct(image) | UploadResponse::Wrapped { data: image } => image,
        };
        ImageRef::Uploaded {
            url: image.url,
            id: image.id,
        }
    }
}
