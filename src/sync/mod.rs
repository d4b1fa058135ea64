//! Configuration synchronization.
//!
//! # Data Flow
//! ```text
//! Load (loader.rs):
//!     baseline.rs (file or URL) → cached draft → 7 page fetches in parallel
//!     → merged SiteConfig + Presentation → SiteStore (if still live)
//!
//! Publish (publisher.rs):
//!     SiteConfig → 7 upserts in parallel (update, then create)
//!     → PublishReport → SiteStore + draft (only when every page succeeded)
//! ```
//!
//! # Design Decisions
//! - Per-page failures are isolated; only an unreachable baseline aborts a load
//! - In-flight requests are never cancelled; a closed `Liveness` stops results
//!   from being applied
//! - No retries

pub mod baseline;
pub mod liveness;
pub mod loader;
pub mod publisher;

pub use baseline::{BaselineError, BaselineSource};
pub use liveness::Liveness;
pub use loader::{ConfigLoader, LoadError, LoadReport, PageLoad};
pub use publisher::{upsert_page, PublishOutcome, PublishReport, Publisher, UpsertOutcome};
