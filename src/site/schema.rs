//! Section schema: which fields each page carries and how.
//!
//! The editor validates every path against this table, so a misspelled field
//! or section is an error instead of a silently written key.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::site::localized::{bilingual_key, Language};
use crate::site::PageKey;

/// A path that does not exist in the schema, or is used the wrong way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("page '{page}' has no field '{field}'")]
    UnknownField { page: PageKey, field: String },

    #[error("page '{page}' has no list section '{section}'")]
    UnknownSection { page: PageKey, section: String },

    #[error("section '{section}' records have no field '{field}'")]
    UnknownItemField { section: String, field: String },

    #[error("field '{0}' is bilingual and needs a language")]
    LanguageRequired(String),

    #[error("field '{field}' is not {expected}")]
    WrongKind { field: String, expected: &'static str },
}

/// How a field is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Two keys, `<name>_ar` and `<name>_en`.
    Bilingual,
    /// One language-neutral key.
    Plain,
    /// One key holding an image reference.
    Image,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Storage keys this field occupies.
    pub fn keys(&self) -> Vec<String> {
        match self.kind {
            FieldKind::Bilingual => Language::ALL
                .iter()
                .map(|lang| bilingual_key(self.name, *lang))
                .collect(),
            FieldKind::Plain | FieldKind::Image => vec![self.name.to_string()],
        }
    }

    /// Storage key for one language; language-neutral fields ignore `lang`.
    pub fn key(&self, lang: Option<Language>) -> Option<String> {
        match (self.kind, lang) {
            (FieldKind::Bilingual, Some(lang)) => Some(bilingual_key(self.name, lang)),
            (FieldKind::Bilingual, None) => None,
            _ => Some(self.name.to_string()),
        }
    }
}

/// Shape of one entry in a repeatable list section.
#[derive(Debug, Clone, Copy)]
pub enum ItemShape {
    Record(&'static [FieldSpec]),
    Image,
}

#[derive(Debug, Clone, Copy)]
pub struct ListSpec {
    pub name: &'static str,
    pub item: ItemShape,
}

impl ListSpec {
    /// Record appended when the caller supplies none: every key present, empty.
    pub fn default_item(&self) -> Value {
        match self.item {
            ItemShape::Image => Value::String(String::new()),
            ItemShape::Record(fields) => {
                let mut record = Map::new();
                for key in fields.iter().flat_map(FieldSpec::keys) {
                    record.insert(key, Value::String(String::new()));
                }
                Value::Object(record)
            }
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        match self.item {
            ItemShape::Record(fields) => fields.iter().find(|f| f.name == name),
            ItemShape::Image => None,
        }
    }
}

#[derive(Debug)]
pub struct PageSchema {
    pub page: PageKey,
    pub fields: &'static [FieldSpec],
    pub lists: &'static [ListSpec],
}

impl PageSchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn list(&self, name: &str) -> Option<&'static ListSpec> {
        self.lists.iter().find(|l| l.name == name)
    }
}

const fn bi(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Bilingual }
}

const fn plain(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Plain }
}

const fn image(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Image }
}

const GALLERY: ListSpec = ListSpec { name: "gallery", item: ItemShape::Image };

static HOME: PageSchema = PageSchema {
    page: PageKey::Home,
    fields: &[
        bi("hero_title"),
        bi("hero_subtitle"),
        bi("hero_description"),
        bi("hero_button"),
        image("hero_image"),
        bi("why_title"),
        bi("how_title"),
        plain("video_url"),
    ],
    lists: &[
        ListSpec {
            name: "why_items",
            item: ItemShape::Record(&[bi("title"), bi("description"), plain("icon")]),
        },
        ListSpec {
            name: "how_steps",
            item: ItemShape::Record(&[bi("title"), bi("description"), image("image")]),
        },
    ],
};

static ABOUT: PageSchema = PageSchema {
    page: PageKey::About,
    fields: &[
        bi("hero_title"),
        bi("hero_description"),
        bi("mission"),
        bi("vision"),
        image("main_image"),
    ],
    lists: &[
        ListSpec {
            name: "about_items",
            item: ItemShape::Record(&[bi("title"), bi("description"), plain("icon")]),
        },
        GALLERY,
    ],
};

static FOUNDER: PageSchema = PageSchema {
    page: PageKey::Founder,
    fields: &[
        bi("name"),
        bi("position"),
        bi("bio"),
        bi("quote"),
        image("main_image"),
    ],
    lists: &[
        ListSpec {
            name: "sections",
            item: ItemShape::Record(&[bi("title"), bi("content")]),
        },
        ListSpec {
            name: "sidebar_cards",
            item: ItemShape::Record(&[bi("title"), bi("value"), plain("icon")]),
        },
        GALLERY,
    ],
};

static CONTACT: PageSchema = PageSchema {
    page: PageKey::Contact,
    fields: &[
        bi("hero_title"),
        bi("address"),
        bi("working_hours"),
        plain("phone"),
        plain("email"),
        plain("map_url"),
    ],
    lists: &[ListSpec {
        name: "branches",
        item: ItemShape::Record(&[bi("name"), bi("address"), plain("phone")]),
    }],
};

const LISTING_FIELDS: &[FieldSpec] =
    &[bi("hero_title"), bi("hero_description"), image("hero_image")];

static CONFERENCES: PageSchema = PageSchema {
    page: PageKey::Conferences,
    fields: LISTING_FIELDS,
    lists: &[],
};

static ARTICLES: PageSchema = PageSchema {
    page: PageKey::Articles,
    fields: LISTING_FIELDS,
    lists: &[],
};

static EXPERTS: PageSchema = PageSchema {
    page: PageKey::Experts,
    fields: LISTING_FIELDS,
    lists: &[],
};

/// Storage key of a page-level field.
pub fn resolve_field(
    page: PageKey,
    field: &str,
    lang: Option<Language>,
) -> Result<String, SchemaError> {
    let spec = page_schema(page)
        .field(field)
        .ok_or_else(|| SchemaError::UnknownField {
            page,
            field: field.to_string(),
        })?;
    spec.key(lang)
        .ok_or_else(|| SchemaError::LanguageRequired(field.to_string()))
}

/// Page-level field that must hold an image.
pub fn resolve_image_field(page: PageKey, field: &str) -> Result<String, SchemaError> {
    let spec = page_schema(page)
        .field(field)
        .ok_or_else(|| SchemaError::UnknownField {
            page,
            field: field.to_string(),
        })?;
    if spec.kind != FieldKind::Image {
        return Err(SchemaError::WrongKind {
            field: field.to_string(),
            expected: "an image",
        });
    }
    Ok(spec.name.to_string())
}

pub fn resolve_list(page: PageKey, section: &str) -> Result<&'static ListSpec, SchemaError> {
    page_schema(page)
        .list(section)
        .ok_or_else(|| SchemaError::UnknownSection {
            page,
            section: section.to_string(),
        })
}

/// Storage key of a field inside a list record.
pub fn resolve_item_field(
    list: &ListSpec,
    field: &str,
    lang: Option<Language>,
) -> Result<String, SchemaError> {
    let spec = list.field(field).ok_or_else(|| SchemaError::UnknownItemField {
        section: list.name.to_string(),
        field: field.to_string(),
    })?;
    spec.key(lang)
        .ok_or_else(|| SchemaError::LanguageRequired(field.to_string()))
}

/// Schema of one page.
pub fn page_schema(page: PageKey) -> &'static PageSchema {
    match page {
        PageKey::Home => &HOME,
        PageKey::About => &ABOUT,
        PageKey::Founder => &FOUNDER,
        PageKey::Contact => &CONTACT,
        PageKey::Conferences => &CONFERENCES,
        PageKey::Articles => &ARTICLES,
        PageKey::Experts => &EXPERTS,
    }
}
