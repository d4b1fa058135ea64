//! Layer merging for the loader.
//!
//! Precedence, lowest first: baseline document, cached draft, remote page
//! records. The draft merges at the top level only; remote records merge
//! attribute by attribute into their page.

use serde_json::{Map, Value};

use crate::site::{PageKey, SiteConfig};

/// Overlay a draft: its top-level keys replace the base wholesale.
pub fn merge_draft(base: &mut SiteConfig, draft: SiteConfig) {
    let root = base.root_mut();
    for (key, value) in draft.into_root() {
        root.insert(key, value);
    }
}

/// Overlay remote attributes onto a page; remote wins, other base keys survive.
pub fn merge_page(base: Option<&Value>, remote: Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.and_then(Value::as_object).cloned().unwrap_or_default();
    merged.extend(remote);
    merged
}

/// Apply a decoded remote record to one page of the document.
pub fn merge_remote_page(config: &mut SiteConfig, page: PageKey, remote: Map<String, Value>) {
    let merged = merge_page(config.get(page.as_str()), remote);
    config.set_page(page, merged);
}

/// Normalize a remote `attributes` payload.
///
/// Some records carry their attributes as a JSON-encoded string. Anything that
/// does not end up as an object yields `None` and the caller skips merging.
pub fn decode_attributes(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}
