//! Languages, text direction and bilingual strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::site::SiteError;

/// A supported display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Ar, Language::En];

    /// Two-letter code, also the suffix of bilingual keys.
    pub fn code(self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Language::Ar => Direction::Rtl,
            Language::En => Direction::Ltr,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ar" => Ok(Language::Ar),
            "en" => Ok(Language::En),
            other => Err(SiteError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Text direction of the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rtl,
    Ltr,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Rtl => "rtl",
            Direction::Ltr => "ltr",
        }
    }
}

/// Key of one language variant of a bilingual field, e.g. `hero_title_ar`.
pub fn bilingual_key(field: &str, lang: Language) -> String {
    format!("{field}_{}", lang.code())
}

/// Text form of a scalar attribute. Objects, arrays and null count as absent.
pub fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A user-facing label in both languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizedString {
    pub ar: String,
    pub en: String,
}

impl LocalizedString {
    pub fn new(ar: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            ar: ar.into(),
            en: en.into(),
        }
    }

    /// Read `<field>_ar` / `<field>_en` out of an attribute bag.
    pub fn from_attributes(bag: &Map<String, Value>, field: &str) -> Self {
        let read = |lang| {
            bag.get(&bilingual_key(field, lang))
                .and_then(text_value)
                .unwrap_or_default()
        };
        Self {
            ar: read(Language::Ar),
            en: read(Language::En),
        }
    }

    pub fn get(&self, lang: Language) -> &str {
        match lang {
            Language::Ar => &self.ar,
            Language::En => &self.en,
        }
    }

    /// Active language if non-empty, else English, else empty.
    pub fn translate(&self, lang: Language) -> &str {
        let value = self.get(lang);
        if !value.is_empty() {
            return value;
        }
        &self.en
    }

    pub fn is_empty(&self) -> bool {
        self.ar.is_empty() && self.en.is_empty()
    }
}
