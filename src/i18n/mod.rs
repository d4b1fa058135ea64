//! Localization accessor.
//!
//! A purely local projection of the configuration onto one language: no
//! network access, direction updates synchronously on switch.

use std::sync::Arc;

use crate::site::localized::text_value;
use crate::site::schema::{page_schema, FieldKind};
use crate::site::{
    Direction, ImageRef, Language, LocalizedString, PageKey, SeoConfig, SeoField, SiteConfig,
};
use crate::storage::{self, DeviceStorage, StorageError};

pub struct Localizer {
    language: Language,
    direction: Direction,
    storage: Arc<dyn DeviceStorage>,
    image_domain: String,
}

impl Localizer {
    pub fn new(storage: Arc<dyn DeviceStorage>, language: Language) -> Self {
        Self {
            language,
            direction: language.direction(),
            storage,
            image_domain: String::new(),
        }
    }

    /// Domain that relative image paths resolve against.
    pub fn with_image_domain(mut self, domain: &str) -> Self {
        self.image_domain = domain.to_string();
        self
    }

    /// Start from the persisted language (Arabic when none is stored).
    pub fn restore(storage: Arc<dyn DeviceStorage>) -> Self {
        let language = storage::load_language(storage.as_ref());
        Self::new(storage, language)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Switch language and direction, then persist the choice.
    ///
    /// The switch takes effect even if persisting fails.
    pub fn set_language(&mut self, language: Language) -> Result<Direction, StorageError> {
        self.language = language;
        self.direction = language.direction();
        tracing::debug!(
            language = %language,
            direction = self.direction.as_str(),
            "Language switched"
        );
        storage::save_language(self.storage.as_ref(), language)?;
        Ok(self.direction)
    }

    pub fn translate<'a>(&self, text: &'a LocalizedString) -> &'a str {
        text.translate(self.language)
    }

    /// Display string of a page field. Language-neutral fields read as-is;
    /// image fields resolve to an absolute URL.
    pub fn field(&self, config: &SiteConfig, page: PageKey, field: &str) -> String {
        let Some(bag) = config.page(page) else {
            return String::new();
        };
        let kind = page_schema(page).field(field).map(|spec| spec.kind);
        match kind {
            Some(FieldKind::Image) => bag
                .get(field)
                .and_then(ImageRef::from_value)
                .map(|image| image.resolve(&self.image_domain))
                .unwrap_or_default(),
            Some(FieldKind::Plain) => bag.get(field).and_then(text_value).unwrap_or_default(),
            Some(FieldKind::Bilingual) | None => self
                .translate(&LocalizedString::from_attributes(bag, field))
                .to_string(),
        }
    }

    pub fn seo(&self, config: &SiteConfig, page: PageKey, field: SeoField) -> String {
        let seo = config.page(page).map(SeoConfig::from_page).unwrap_or_default();
        self.translate(seo.get(field)).to_string()
    }
}
