//! Visual editor over a working copy of the configuration.
//!
//! # Responsibilities
//! - Hold a private working copy; the canonical store is untouched until save
//! - Scalar, SEO and list-section edits through typed store actions
//! - Media flows with optimistic placeholders (media.rs)
//!
//! # Design Decisions
//! - Every edit is applied synchronously; no batching, undo or conflict checks
//! - Saving writes the canonical store and the device draft, never the remote

pub mod media;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::remote::RemoteError;
use crate::site::schema::{resolve_field, resolve_list};
use crate::site::{Language, PageKey, SeoConfig, SeoField, SiteConfig};
use crate::storage::{self, DeviceStorage, StorageError};
use crate::store::{ActionError, SiteStore, StoreAction};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("remote request failed: {0}")]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// An open editing session.
pub struct Editor<'s> {
    store: &'s SiteStore,
    base: Arc<SiteConfig>,
    working: SiteConfig,
}

impl<'s> Editor<'s> {
    /// Open on a copy of the canonical configuration.
    pub fn open(store: &'s SiteStore) -> Self {
        let base = store.snapshot();
        let working = (*base).clone();
        Self {
            store,
            base,
            working,
        }
    }

    pub fn working(&self) -> &SiteConfig {
        &self.working
    }

    /// Whether the working copy differs from the canonical document at open/save.
    pub fn is_dirty(&self) -> bool {
        self.working != *self.base
    }

    /// Apply one action to the working copy.
    pub fn apply(&mut self, action: &StoreAction) -> Result<Option<Value>, EditorError> {
        Ok(action.apply_to(&mut self.working)?)
    }

    /// Raw value of a page field; `lang` selects the bilingual variant.
    pub fn field(
        &self,
        page: PageKey,
        field: &str,
        lang: Option<Language>,
    ) -> Result<Option<&Value>, EditorError> {
        let key = resolve_field(page, field, lang).map_err(ActionError::from)?;
        Ok(self.working.page(page).and_then(|bag| bag.get(&key)))
    }

    /// Set any page field; language-neutral fields ignore `lang`.
    pub fn set_value(
        &mut self,
        page: PageKey,
        field: &str,
        lang: Option<Language>,
        value: Value,
    ) -> Result<(), EditorError> {
        self.apply(&StoreAction::SetField {
            page,
            field: field.to_string(),
            lang,
            value,
        })?;
        Ok(())
    }

    /// Bind `config[page][field_{lang}]`.
    pub fn set_text(
        &mut self,
        page: PageKey,
        field: &str,
        lang: Language,
        value: &str,
    ) -> Result<(), EditorError> {
        self.set_value(page, field, Some(lang), Value::String(value.to_string()))
    }

    pub fn seo(&self, page: PageKey) -> SeoConfig {
        self.working.page(page).map(SeoConfig::from_page).unwrap_or_default()
    }

    pub fn set_seo(
        &mut self,
        page: PageKey,
        field: SeoField,
        lang: Language,
        value: &str,
    ) -> Result<(), EditorError> {
        self.apply(&StoreAction::SetSeo {
            page,
            field,
            lang,
            value: value.to_string(),
        })?;
        Ok(())
    }

    /// Entries of a list section; a missing list reads as empty.
    pub fn items(&self, page: PageKey, section: &str) -> Result<&[Value], EditorError> {
        resolve_list(page, section).map_err(ActionError::from)?;
        match self.working.page(page).and_then(|bag| bag.get(section)) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(ActionError::NotAList {
                page,
                section: section.to_string(),
            }
            .into()),
        }
    }

    /// Push a record (or the schema default) and return its index.
    pub fn append(
        &mut self,
        page: PageKey,
        section: &str,
        item: Option<Value>,
    ) -> Result<usize, EditorError> {
        self.apply(&StoreAction::AppendItem {
            page,
            section: section.to_string(),
            item,
        })?;
        Ok(self.items(page, section)?.len() - 1)
    }

    /// Splice out the record at `index` and return it.
    pub fn remove(
        &mut self,
        page: PageKey,
        section: &str,
        index: usize,
    ) -> Result<Value, EditorError> {
        let removed = self.apply(&StoreAction::RemoveItem {
            page,
            section: section.to_string(),
            index,
        })?;
        Ok(removed.unwrap_or(Value::Null))
    }

    /// Replace one field of one record.
    pub fn update_field(
        &mut self,
        page: PageKey,
        section: &str,
        index: usize,
        field: &str,
        lang: Option<Language>,
        value: Value,
    ) -> Result<(), EditorError> {
        self.apply(&StoreAction::UpdateItemField {
            page,
            section: section.to_string(),
            index,
            field: field.to_string(),
            lang,
            value,
        })?;
        Ok(())
    }

    /// Copy the working copy into the canonical store and the device draft.
    pub fn save(&mut self, storage: &dyn DeviceStorage) -> Result<(), EditorError> {
        self.store.replace(self.working.clone());
        self.base = self.store.snapshot();
        storage::save_draft(storage, &self.working)?;
        tracing::info!("Editor changes saved to draft");
        Ok(())
    }

    /// Drop the working copy without touching the store.
    pub fn discard(self) {
        if self.is_dirty() {
            tracing::debug!("Discarding unsaved editor changes");
        }
    }
}
