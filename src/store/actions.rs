//! Typed update actions on the site configuration.
//!
//! Every action addresses exactly one page and is validated against the
//! section schema before anything is written.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::site::schema::{resolve_field, resolve_item_field, resolve_list, ItemShape, SchemaError};
use crate::site::seo::set_seo;
use crate::site::{Language, PageKey, SeoField, SiteConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("index {index} out of range for '{section}' ({len} items)")]
    IndexOutOfRange {
        section: String,
        index: usize,
        len: usize,
    },

    #[error("'{page}.{section}' holds a non-list value")]
    NotAList { page: PageKey, section: String },

    #[error("invalid item for '{section}': {reason}")]
    InvalidItem { section: String, reason: String },
}

/// One edit to one page.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    /// Set a page-level field; `lang` selects the variant of bilingual fields.
    SetField {
        page: PageKey,
        field: String,
        lang: Option<Language>,
        value: Value,
    },
    /// Remove a page-level field.
    ClearField {
        page: PageKey,
        field: String,
        lang: Option<Language>,
    },
    SetSeo {
        page: PageKey,
        field: SeoField,
        lang: Language,
        value: String,
    },
    ReplacePage {
        page: PageKey,
        attributes: Map<String, Value>,
    },
    /// Push onto a list section; `None` appends the schema default record.
    AppendItem {
        page: PageKey,
        section: String,
        item: Option<Value>,
    },
    RemoveItem {
        page: PageKey,
        section: String,
        index: usize,
    },
    ReplaceItem {
        page: PageKey,
        section: String,
        index: usize,
        item: Value,
    },
    UpdateItemField {
        page: PageKey,
        section: String,
        index: usize,
        field: String,
        lang: Option<Language>,
        value: Value,
    },
}

impl StoreAction {
    pub fn page(&self) -> PageKey {
        match self {
            StoreAction::SetField { page, .. }
            | StoreAction::ClearField { page, .. }
            | StoreAction::SetSeo { page, .. }
            | StoreAction::ReplacePage { page, .. }
            | StoreAction::AppendItem { page, .. }
            | StoreAction::RemoveItem { page, .. }
            | StoreAction::ReplaceItem { page, .. }
            | StoreAction::UpdateItemField { page, .. } => *page,
        }
    }

    /// Apply to a document. Returns the value displaced by the edit, if any.
    pub fn apply_to(&self, config: &mut SiteConfig) -> Result<Option<Value>, ActionError> {
        match self {
            StoreAction::SetField { page, field, lang, value } => {
                let key = resolve_field(*page, field, *lang)?;
                Ok(config.page_mut(*page).insert(key, value.clone()))
            }
            StoreAction::ClearField { page, field, lang } => {
                let key = resolve_field(*page, field, *lang)?;
                Ok(config.page_mut(*page).remove(&key))
            }
            StoreAction::SetSeo { page, field, lang, value } => {
                set_seo(config.page_mut(*page), *field, *lang, value);
                Ok(None)
            }
            StoreAction::ReplacePage { page, attributes } => {
                let previous = config.get(page.as_str()).cloned();
                config.set_page(*page, attributes.clone());
                Ok(previous)
            }
            StoreAction::AppendItem { page, section, item } => {
                let list = resolve_list(*page, section)?;
                let item = match item {
                    Some(item) => item.clone(),
                    None => list.default_item(),
                };
                check_item(list.item, section, &item)?;
                list_mut(config, *page, section)?.push(item);
                Ok(None)
            }
            StoreAction::RemoveItem { page, section, index } => {
                resolve_list(*page, section)?;
                check_index(section, *index, list_len(config, *page, section)?)?;
                let items = list_mut(config, *page, section)?;
                Ok(Some(items.remove(*index)))
            }
            StoreAction::ReplaceItem { page, section, index, item } => {
                let list = resolve_list(*page, section)?;
                check_item(list.item, section, item)?;
                check_index(section, *index, list_len(config, *page, section)?)?;
                let items = list_mut(config, *page, section)?;
                Ok(Some(std::mem::replace(&mut items[*index], item.clone())))
            }
            StoreAction::UpdateItemField { page, section, index, field, lang, value } => {
                let list = resolve_list(*page, section)?;
                let key = resolve_item_field(list, field, *lang)?;
                check_index(section, *index, list_len(config, *page, section)?)?;
                let items = list_mut(config, *page, section)?;
                match &mut items[*index] {
                    Value::Object(record) => Ok(record.insert(key, value.clone())),
                    _ => Err(ActionError::InvalidItem {
                        section: section.clone(),
                        reason: format!("item {index} is not a record"),
                    }),
                }
            }
        }
    }
}

fn check_index(section: &str, index: usize, len: usize) -> Result<(), ActionError> {
    if index < len {
        Ok(())
    } else {
        Err(ActionError::IndexOutOfRange {
            section: section.to_string(),
            index,
            len,
        })
    }
}

fn check_item(shape: ItemShape, section: &str, item: &Value) -> Result<(), ActionError> {
    let ok = match shape {
        ItemShape::Record(_) => item.is_object(),
        ItemShape::Image => item.is_string() || item.is_object(),
    };
    if ok {
        Ok(())
    } else {
        Err(ActionError::InvalidItem {
            section: section.to_string(),
            reason: format!("unexpected value {item}"),
        })
    }
}

/// Length of the list at `page.section` without creating it.
fn list_len(config: &SiteConfig, page: PageKey, section: &str) -> Result<usize, ActionError> {
    match config.page(page).and_then(|p| p.get(section)) {
        None => Ok(0),
        Some(Value::Array(items)) => Ok(items.len()),
        Some(_) => Err(ActionError::NotAList {
            page,
            section: section.to_string(),
        }),
    }
}

/// The list at `page.section`, created empty if absent.
fn list_mut<'a>(
    config: &'a mut SiteConfig,
    page: PageKey,
    section: &str,
) -> Result<&'a mut Vec<Value>, ActionError> {
    let slot = config
        .page_mut(page)
        .entry(section)
        .or_insert_with(|| Value::Array(Vec::new()));
    match slot {
        Value::Array(items) => Ok(items),
        _ => Err(ActionError::NotAList {
            page,
            section: section.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> SiteConfig {
        SiteConfig::from_value(json!({
            "home": {
                "hero_title_en": "A",
                "why_items": [{ "title_en": "One", "title_ar": "واحد" }],
            },
            "about": { "mission_en": "Care" },
        }))
        .unwrap()
    }

    fn append(item: Option<Value>) -> StoreAction {
        StoreAction::AppendItem {
            page: PageKey::Home,
            section: "why_items".into(),
            item,
        }
    }

    #[test]
    fn test_set_field_touches_only_its_page() {
        let mut c = config();
        let previous = StoreAction::SetField {
            page: PageKey::Home,
            field: "hero_title".into(),
            lang: Some(Language::En),
            value: json!("B"),
        }
        .apply_to(&mut c)
        .unwrap();

        assert_eq!(previous, Some(json!("A")));
        assert_eq!(c.page(PageKey::Home).unwrap()["hero_title_en"], "B");
        assert_eq!(c.get("about").unwrap(), &json!({ "mission_en": "Care" }));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut c = config();
        let err = StoreAction::SetField {
            page: PageKey::Home,
            field: "hero_titel".into(),
            lang: Some(Language::En),
            value: json!("B"),
        }
        .apply_to(&mut c)
        .unwrap_err();
        assert!(matches!(err, ActionError::Schema(SchemaError::UnknownField { .. })));
        assert_eq!(c, config());
    }

    #[test]
    fn test_append_then_remove_round_trip() {
        let mut c = config();
        let original = c.page(PageKey::Home).unwrap()["why_items"].clone();

        append(Some(json!({ "title_en": "Two" }))).apply_to(&mut c).unwrap();
        let len = c.page(PageKey::Home).unwrap()["why_items"].as_array().unwrap().len();
        StoreAction::RemoveItem {
            page: PageKey::Home,
            section: "why_items".into(),
            index: len - 1,
        }
        .apply_to(&mut c)
        .unwrap();

        assert_eq!(c.page(PageKey::Home).unwrap()["why_items"], original);
    }

    #[test]
    fn test_append_default_record_to_missing_list() {
        let mut c = config();
        StoreAction::AppendItem {
            page: PageKey::Home,
            section: "how_steps".into(),
            item: None,
        }
        .apply_to(&mut c)
        .unwrap();

        let steps = c.page(PageKey::Home).unwrap()["how_steps"].as_array().unwrap().clone();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0]["title_ar"], "");
        assert_eq!(steps[0]["image"], "");
    }

    #[test]
    fn test_record_list_rejects_scalars() {
        let mut c = config();
        let err = append(Some(json!("text"))).apply_to(&mut c).unwrap_err();
        assert!(matches!(err, ActionError::InvalidItem { .. }));
    }

    #[test]
    fn test_remove_out_of_range_leaves_list() {
        let mut c = config();
        let err = StoreAction::RemoveItem {
            page: PageKey::Home,
            section: "why_items".into(),
            index: 5,
        }
        .apply_to(&mut c)
        .unwrap_err();

        assert_eq!(
            err,
            ActionError::IndexOutOfRange {
                section: "why_items".into(),
                index: 5,
                len: 1
            }
        );
        assert_eq!(c, config());
    }

    #[test]
    fn test_update_item_field() {
        let mut c = config();
        StoreAction::UpdateItemField {
            page: PageKey::Home,
            section: "why_items".into(),
            index: 0,
            field: "description".into(),
            lang: Some(Language::Ar),
            value: json!("وصف"),
        }
        .apply_to(&mut c)
        .unwrap();

        let item = &c.page(PageKey::Home).unwrap()["why_items"][0];
        assert_eq!(item["description_ar"], "وصف");
        assert_eq!(item["title_en"], "One");
    }

    #[test]
    fn test_non_list_value_is_not_overwritten() {
        let mut c = SiteConfig::from_value(json!({ "home": { "why_items": "legacy" } })).unwrap();
        let err = append(None).apply_to(&mut c).unwrap_err();
        assert!(matches!(err, ActionError::NotAList { .. }));
        assert_eq!(c.page(PageKey::Home).unwrap()["why_items"], "legacy");
    }

    #[test]
    fn test_replace_page_swaps_one_page_only() {
        let mut c = config();
        let action = StoreAction::ReplacePage {
            page: PageKey::About,
            attributes: json!({ "vision_en": "Reach" }).as_object().cloned().unwrap(),
        };
        assert_eq!(action.page(), PageKey::About);

        let previous = action.apply_to(&mut c).unwrap();
        assert_eq!(previous, Some(json!({ "mission_en": "Care" })));
        assert_eq!(c.get("about").unwrap(), &json!({ "vision_en": "Reach" }));
        assert_eq!(c.get("home"), config().get("home"));

        let created = StoreAction::ReplacePage {
            page: PageKey::Contact,
            attributes: Map::new(),
        }
        .apply_to(&mut c)
        .unwrap();
        assert_eq!(created, None);
        assert_eq!(c.get("contact").unwrap(), &json!({}));
        assert_eq!(c.root().len(), 3);
    }
}
