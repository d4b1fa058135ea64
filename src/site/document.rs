//! The root site configuration document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::site::{PageKey, SiteError};

/// Root document keyed by page name.
///
/// Keys other than the seven page keys (such as `theme`) pass through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteConfig {
    root: Map<String, Value>,
}

impl SiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self, SiteError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(SiteError::NotAnObject),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, SiteError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.root
    }

    /// Any top-level entry, page or pass-through.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// Attribute bag of a page, if present and an object.
    pub fn page(&self, key: PageKey) -> Option<&Map<String, Value>> {
        self.root.get(key.as_str()).and_then(Value::as_object)
    }

    /// Mutable attribute bag of a page, created empty if missing.
    pub fn page_mut(&mut self, key: PageKey) -> &mut Map<String, Value> {
        let slot = self
            .root
            .entry(key.as_str())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(map) => map,
            _ => unreachable!("page slot normalized to an object"),
        }
    }

    pub fn set_page(&mut self, key: PageKey, attributes: Map<String, Value>) {
        self.root.insert(key.as_str().to_string(), Value::Object(attributes));
    }

    /// Page attributes ready to publish; a missing page publishes as `{}`.
    pub fn page_or_empty(&self, key: PageKey) -> Map<String, Value> {
        self.page(key).cloned().unwrap_or_default()
    }

    pub(crate) fn into_root(self) -> Map<String, Value> {
        self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    pub fn to_pretty_json(&self) -> Result<String, SiteError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_must_be_object() {
        assert!(SiteConfig::from_value(json!([1, 2])).is_err());
        assert!(SiteConfig::from_json("not json").is_err());
        assert!(SiteConfig::from_json("{}").unwrap().root().is_empty());
    }

    #[test]
    fn test_page_mut_normalizes_slot() {
        let mut config =
            SiteConfig::from_value(json!({ "home": "oops", "theme": { "x": 1 } })).unwrap();
        assert!(config.page(PageKey::Home).is_none());

        config.page_mut(PageKey::Home).insert("hero_title_en".into(), json!("Hi"));
        assert_eq!(config.page(PageKey::Home).unwrap()["hero_title_en"], "Hi");
        assert_eq!(config.get("theme"), Some(&json!({ "x": 1 })));
    }

    #[test]
    fn test_page_or_empty() {
        let config = SiteConfig::new();
        assert!(config.page_or_empty(PageKey::Experts).is_empty());
    }
}
