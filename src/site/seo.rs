//! Per-page SEO sub-record.

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::site::localized::{bilingual_key, Language, LocalizedString};

/// Key of the SEO object inside a page.
pub const SEO_KEY: &str = "seo";

/// One bilingual SEO attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeoField {
    MetaTitle,
    MetaDescription,
    Keywords,
}

impl SeoField {
    pub const ALL: [SeoField; 3] =
        [SeoField::MetaTitle, SeoField::MetaDescription, SeoField::Keywords];

    pub fn as_str(self) -> &'static str {
        match self {
            SeoField::MetaTitle => "meta_title",
            SeoField::MetaDescription => "meta_description",
            SeoField::Keywords => "keywords",
        }
    }
}

impl FromStr for SeoField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeoField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown SEO field '{s}'"))
    }
}

/// Typed view of a page's SEO object. Absent values read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoConfig {
    pub meta_title: LocalizedString,
    pub meta_description: LocalizedString,
    pub keywords: LocalizedString,
}

impl SeoConfig {
    pub fn from_page(page: &Map<String, Value>) -> Self {
        let Some(seo) = page.get(SEO_KEY).and_then(Value::as_object) else {
            return Self::default();
        };
        Self {
            meta_title: LocalizedString::from_attributes(seo, SeoField::MetaTitle.as_str()),
            meta_description: LocalizedString::from_attributes(
                seo,
                SeoField::MetaDescription.as_str(),
            ),
            keywords: LocalizedString::from_attributes(seo, SeoField::Keywords.as_str()),
        }
    }

    pub fn get(&self, field: SeoField) -> &LocalizedString {
        match field {
            SeoField::MetaTitle => &self.meta_title,
            SeoField::MetaDescription => &self.meta_description,
            SeoField::Keywords => &self.keywords,
        }
    }
}

/// Set one SEO value, creating the SEO object on first edit.
pub fn set_seo(page: &mut Map<String, Value>, field: SeoField, lang: Language, value: &str) {
    let slot = page
        .entry(SEO_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(seo) = slot {
        seo.insert(bilingual_key(field.as_str(), lang), Value::String(value.to_string()));
    }
}
