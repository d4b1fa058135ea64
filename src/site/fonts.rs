//! Font families applied to global presentation state.

use serde_json::Value;

use crate::site::localized::{Language, LocalizedString};
use crate::site::SiteConfig;

/// Pass-through key holding presentation settings.
pub const THEME_KEY: &str = "theme";

/// Global presentation state derived from the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
    pub body_font: LocalizedString,
    pub heading_font: LocalizedString,
}

impl Presentation {
    /// Collect `font_family_*` and `heading_font_family_*` from `theme`.
    pub fn from_config(config: &SiteConfig) -> Self {
        let Some(theme) = config.get(THEME_KEY).and_then(Value::as_object) else {
            return Self::default();
        };
        Self {
            body_font: LocalizedString::from_attributes(theme, "font_family"),
            heading_font: LocalizedString::from_attributes(theme, "heading_font_family"),
        }
    }

    pub fn body_font(&self, lang: Language) -> Option<&str> {
        Some(self.body_font.translate(lang)).filter(|f| !f.is_empty())
    }

    /// Heading font, falling back to the body font.
    pub fn heading_font(&self, lang: Language) -> Option<&str> {
        Some(self.heading_font.translate(lang))
            .filter(|f| !f.is_empty())
            .or_else(|| self.body_font(lang))
    }

    /// CSS custom properties for the active language.
    pub fn css_variables(&self, lang: Language) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();
        if let Some(font) = self.body_font(lang) {
            vars.push(("--font-body", font.to_string()));
        }
        if let Some(font) = self.heading_font(lang) {
            vars.push(("--font-heading", font.to_string()));
        }
        vars
    }
}
