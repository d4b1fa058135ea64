//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! loader / publisher / editor produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters per page and operation)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`page`, `outcome`) on every sync event
//! - Metrics go through the `metrics` facade; no exporter is installed here

pub mod logging;
pub mod metrics;
