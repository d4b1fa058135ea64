//! Sync metrics.
//!
//! # Metrics
//! - `site_sync_page_loads_total` (counter): remote page fetches by page, outcome
//! - `site_sync_page_publishes_total` (counter): upserts by page, outcome
//! - `site_sync_media_operations_total` (counter): uploads/deletes by op, result

use metrics::counter;

/// Record one per-page load attempt.
pub fn record_page_load(page: &str, outcome: &'static str) {
    counter!("site_sync_page_loads_total", "page" => page.to_string(), "outcome" => outcome)
        .increment(1);
}

/// Record one per-page upsert.
pub fn record_publish(page: &str, outcome: &'static str) {
    counter!("site_sync_page_publishes_total", "page" => page.to_string(), "outcome" => outcome)
        .increment(1);
}

/// Record a media upload or delete.
pub fn record_media(op: &'static str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    counter!("site_sync_media_operations_total", "op" => op, "result" => result).increment(1);
}
