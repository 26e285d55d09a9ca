// src/ingest/mod.rs
pub mod providers;
pub mod ratelimit;
pub mod scheduler;
pub mod types;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("monitor_polls_total", "Completed poll cycles.");
        describe_counter!(
            "monitor_items_fetched_total",
            "Posts received across all fetches, duplicates included."
        );
        describe_counter!(
            "monitor_new_items_total",
            "Posts seen for the first time."
        );
        describe_counter!(
            "monitor_items_skipped_total",
            "Listing entries dropped for missing or malformed fields."
        );
        describe_counter!(
            "monitor_fetch_errors_total",
            "Failed fetches, labelled by kind."
        );
        describe_gauge!(
            "monitor_ratelimit_remaining",
            "Requests left in the current rate-limit window."
        );
        describe_gauge!(
            "monitor_ratelimit_reset_secs",
            "Seconds until the rate-limit window resets."
        );
        describe_histogram!("monitor_fetch_ms", "Fetch duration in milliseconds.");
    });
}

/// Normalize a post title: decode HTML entities, collapse whitespace, trim.
pub fn normalize_title(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("static regex"));
    let mut out = re_ws.replace_all(&decoded, " ").trim().to_string();

    // Length cap: 300 chars (Reddit's own title limit)
    if out.chars().count() > 300 {
        out = out.chars().take(300).collect();
    }
    out
}
