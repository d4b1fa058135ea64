//! Site configuration document model.
//!
//! # Data Flow
//! ```text
//! baseline JSON ─┐
//! cached draft ──┼─▶ merge.rs ─▶ SiteConfig ─▶ fonts.rs (Presentation)
//! remote pages ──┘                   │
//!                                    ├─▶ localized.rs (per-language lookups)
//!                                    ├─▶ seo.rs / image.rs (typed sub-records)
//!                                    └─▶ schema.rs (which fields a page may carry)
//! ```
//!
//! # Design Decisions
//! - Pages stay free-form JSON objects so unknown keys survive every round trip
//! - Typed access goes through the schema and the bilingual key helpers

pub mod document;
pub mod fonts;
pub mod image;
pub mod localized;
pub mod merge;
pub mod page;
pub mod schema;
pub mod seo;

use thiserror::Error;

pub use document::SiteConfig;
pub use fonts::Presentation;
pub use image::{resolve_image_url, ImageRef};
pub use localized::{bilingual_key, Direction, Language, LocalizedString};
pub use page::PageKey;
pub use schema::SchemaError;
pub use seo::{SeoConfig, SeoField};

/// Errors raised by the document model.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("unknown page '{0}'")]
    UnknownPage(String),

    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    #[error("site configuration root must be a JSON object")]
    NotAnObject,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
