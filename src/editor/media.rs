//! Media flows: optimistic uploads and remote-first deletes.
//!
//! Uploads insert a local placeholder, then swap in the server reference or
//! roll back. Deletes of uploaded images hit the remote store first; the local
//! entry is only removed once that succeeds.

use serde_json::{json, Value};

use crate::editor::{Editor, EditorError};
use crate::observability::metrics;
use crate::remote::MediaStore;
use crate::site::schema::{resolve_image_field, resolve_list, ItemShape, SchemaError};
use crate::site::{ImageRef, PageKey};
use crate::store::{ActionError, StoreAction};

/// Local placeholder URL shown while an upload is in flight.
fn placeholder_url() -> String {
    format!("blob:{}", uuid::Uuid::new_v4())
}

fn is_placeholder(item: &Value, url: &str) -> bool {
    item.get("url").and_then(Value::as_str) == Some(url)
}

fn gallery_section(page: PageKey, section: &str) -> Result<(), EditorError> {
    let list = resolve_list(page, section).map_err(ActionError::from)?;
    match list.item {
        ItemShape::Image => Ok(()),
        ItemShape::Record(_) => Err(ActionError::from(SchemaError::WrongKind {
            field: section.to_string(),
            expected: "an image list",
        })
        .into()),
    }
}

impl Editor<'_> {
    /// Upload into a gallery section. Returns the server reference.
    pub async fn upload_gallery_image(
        &mut self,
        media: &dyn MediaStore,
        page: PageKey,
        section: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImageRef, EditorError> {
        gallery_section(page, section)?;
        let url = placeholder_url();
        self.append(page, section, Some(json!({ "url": url, "id": null, "uploading": true })))?;

        let result = media.upload_image(file_name, bytes).await;
        metrics::record_media("upload", result.is_ok());

        let index = self
            .items(page, section)?
            .iter()
            .position(|item| is_placeholder(item, &url));

        match (result, index) {
            (Ok(image), Some(index)) => {
                self.apply(&StoreAction::ReplaceItem {
                    page,
                    section: section.to_string(),
                    index,
                    item: image.to_value(),
                })?;
                tracing::info!(page = %page, section, id = ?image.id(), "Gallery image uploaded");
                Ok(image)
            }
            (Ok(image), None) => {
                // Placeholder removed meanwhile; keep the upload but don't resurrect the slot.
                tracing::warn!(page = %page, section, "Upload placeholder vanished");
                Ok(image)
            }
            (Err(e), index) => {
                if let Some(index) = index {
                    self.remove(page, section, index)?;
                }
                tracing::warn!(
                    page = %page,
                    section,
                    error = %e,
                    "Gallery upload failed, placeholder removed"
                );
                Err(e.into())
            }
        }
    }

    /// Upload a page's main image, restoring the prior value on failure.
    pub async fn upload_main_image(
        &mut self,
        media: &dyn MediaStore,
        page: PageKey,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImageRef, EditorError> {
        resolve_image_field(page, field).map_err(ActionError::from)?;
        let prior = self.apply(&StoreAction::SetField {
            page,
            field: field.to_string(),
            lang: None,
            value: Value::String(placeholder_url()),
        })?;

        let result = media.upload_image(file_name, bytes).await;
        metrics::record_media("upload", result.is_ok());

        match result {
            Ok(image) => {
                self.set_value(page, field, None, image.to_value())?;
                tracing::info!(page = %page, field, id = ?image.id(), "Main image uploaded");
                Ok(image)
            }
            Err(e) => {
                let restore = match prior {
                    Some(value) => StoreAction::SetField {
                        page,
                        field: field.to_string(),
                        lang: None,
                        value,
                    },
                    None => StoreAction::ClearField {
                        page,
                        field: field.to_string(),
                        lang: None,
                    },
                };
                self.apply(&restore)?;
                tracing::warn!(
                    page = %page,
                    field,
                    error = %e,
                    "Main image upload failed, prior value restored"
                );
                Err(e.into())
            }
        }
    }

    /// Delete a gallery entry. Uploaded images are deleted remotely first.
    pub async fn delete_gallery_image(
        &mut self,
        media: &dyn MediaStore,
        page: PageKey,
        section: &str,
        index: usize,
    ) -> Result<Value, EditorError> {
        gallery_section(page, section)?;
        let len = self.items(page, section)?.len();
        let Some(entry) = self.items(page, section)?.get(index) else {
            return Err(ActionError::IndexOutOfRange {
                section: section.to_string(),
                index,
                len,
            }
            .into());
        };

        if let Some(id) = ImageRef::from_value(entry).and_then(|image| image.id()) {
            let result = media.delete_image(id).await;
            metrics::record_media("delete", result.is_ok());
            if let Err(e) = result {
                tracing::warn!(
                    page = %page,
                    section,
                    id,
                    error = %e,
                    "Remote delete failed, entry kept"
                );
                return Err(e.into());
            }
        }

        self.remove(page, section, index)
    }

    /// Clear a main image field, deleting the uploaded image remotely first.
    pub async fn delete_main_image(
        &mut self,
        media: &dyn MediaStore,
        page: PageKey,
        field: &str,
    ) -> Result<(), EditorError> {
        resolve_image_field(page, field).map_err(ActionError::from)?;
        let id = self
            .field(page, field, None)?
            .and_then(ImageRef::from_value)
            .and_then(|image| image.id());

        if let Some(id) = id {
            let result = media.delete_image(id).await;
            metrics::record_media("delete", result.is_ok());
            if let Err(e) = result {
                tracing::warn!(
                    page = %page,
                    field,
                    id,
                    error = %e,
                    "Remote delete failed, image kept"
                );
                return Err(e.into());
            }
        }

        self.apply(&StoreAction::ClearField {
            page,
            field: field.to_string(),
            lang: None,
        })?;
        Ok(())
    }
}
