//! Bilingual site configuration client.
//!
//! Loads the page-sectioned site configuration from a baseline document, a
//! cached draft and the remote static-content store; exposes localized
//! lookups; edits a working copy; publishes it back page by page.

pub mod config;
pub mod editor;
pub mod i18n;
pub mod notice;
pub mod observability;
pub mod remote;
pub mod site;
pub mod storage;
pub mod store;
pub mod sync;

pub use config::SyncConfig;
pub use editor::Editor;
pub use i18n::Localizer;
pub use remote::RemoteClient;
pub use site::{Language, PageKey, SiteConfig};
pub use store::SiteStore;
pub use sync::{ConfigLoader, Publisher};
