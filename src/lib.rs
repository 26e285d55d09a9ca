// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod ingest;
pub mod report;
pub mod stats;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::ingest::providers::RedditSource;
pub use crate::ingest::ratelimit::{next_delay, RateLimitSnapshot};
pub use crate::ingest::scheduler::RateLimitedPoller;
pub use crate::ingest::types::{FeedBatch, FeedItem, FeedSource, FetchError};
pub use crate::report::{ConsoleReporter, RankedEntry, RankingSnapshot, Reporter};
pub use crate::stats::StatisticsAggregator;

pub use tokio_util::sync::CancellationToken;
