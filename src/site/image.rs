//! Image references and URL resolution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An image attribute: a bare path, or a record uploaded to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    /// Uploaded image; `id` allows later deletion.
    Uploaded { url: String, id: u64 },
    /// Relative path or absolute URL.
    Path(String),
}

impl ImageRef {
    /// Read an image attribute. Placeholders and malformed values yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_value(&self) -> Value {
        match self {
            ImageRef::Uploaded { url, id } => serde_json::json!({ "url": url, "id": id }),
            ImageRef::Path(path) => Value::String(path.clone()),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ImageRef::Uploaded { url, .. } => url,
            ImageRef::Path(path) => path,
        }
    }

    pub fn id(&self) -> Option<u64> {
        match self {
            ImageRef::Uploaded { id, .. } => Some(*id),
            ImageRef::Path(_) => None,
        }
    }

    pub fn resolve(&self, domain: &str) -> String {
        resolve_image_url(self.url(), domain)
    }
}

/// Turn a stored image value into an absolute URL.
///
/// `http(s)`, `data:` and `blob:` values pass through unchanged.
pub fn resolve_image_url(value: &str, domain: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    if value.starts_with("http") || value.starts_with("data:") || value.starts_with("blob:") {
        return value.to_string();
    }
    format!(
        "{}/{}",
        domain.trim_end_matches('/'),
        value.trim_start_matches('/')
    )
}
