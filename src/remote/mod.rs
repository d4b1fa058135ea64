//! Remote static-content store.
//!
//! # Data Flow
//! ```text
//! loader    ── fetch_page ──────────▶ GET  /static?title=<page>
//! publisher ── update_page ─────────▶ POST /update-static?title=<page>
//!           └─ create_page ─────────▶ POST /add-static
//! editor    ── upload_image ────────▶ POST /image (multipart)
//!           └─ delete_image ────────▶ DELETE /image/<id>
//! ```
//!
//! # Design Decisions
//! - Two traits so loader/publisher and media flows can be faked separately
//! - Every request is bounded by the configured timeout
//! - No retries; a failed call is surfaced and re-triggered by the user

pub mod client;
pub mod types;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::site::{ImageRef, PageKey};

pub use client::RemoteClient;
pub use types::{RemoteError, RemoteResult};

/// Page records on the remote store.
#[async_trait]
pub trait StaticStore: Send + Sync {
    /// Raw `attributes` payload: an object, or a JSON-encoded string.
    async fn fetch_page(&self, page: PageKey) -> RemoteResult<Value>;

    /// Overwrite an existing page record.
    async fn update_page(&self, page: PageKey, attributes: &Map<String, Value>) -> RemoteResult<()>;

    /// Create a page record.
    async fn create_page(&self, page: PageKey, attributes: &Map<String, Value>) -> RemoteResult<()>;
}

/// Uploaded images on the remote store.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> RemoteResult<ImageRef>;

    async fn delete_image(&self, id: u64) -> RemoteResult<()>;
}
