// src/ingest/scheduler.rs
//! Fetch, aggregate, report, wait, repeat.
//!
//! The wait after each fetch comes from that fetch's own rate-limit headers
//! (see [`next_delay`]). Cancellation is cooperative: it is checked before every
//! fetch and races the wait, so a cancelled run never issues another request.
//! A fetch already in flight is allowed to finish. Fetch failures end the run
//! and are returned to the caller; nothing is retried here.

use metrics::{counter, gauge};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::ingest::ratelimit::next_delay;
use crate::ingest::types::{FeedSource, FetchError};
use crate::report::{RankingSnapshot, Reporter};
use crate::stats::StatisticsAggregator;

pub const DEFAULT_SHOW_LIMIT: usize = 10;

/// Owns the ranking state for the lifetime of a run.
pub struct RateLimitedPoller<S, R> {
    source: S,
    reporter: R,
    stats: StatisticsAggregator,
    show_limit: usize,
}

impl<S: FeedSource, R: Reporter> RateLimitedPoller<S, R> {
    pub fn new(source: S, reporter: R) -> Self {
        Self {
            source,
            reporter,
            stats: StatisticsAggregator::new(),
            show_limit: DEFAULT_SHOW_LIMIT,
        }
    }

    /// Rows per ranking handed to the reporter.
    pub fn with_show_limit(mut self, n: usize) -> Self {
        self.show_limit = n;
        self
    }

    pub fn stats(&self) -> &StatisticsAggregator {
        &self.stats
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Poll `topic` until `cancel` fires (`Ok`) or a fetch fails (`Err`).
    pub async fn run(&mut self, topic: &str, cancel: &CancellationToken) -> Result<(), FetchError> {
        crate::ingest::ensure_metrics_described();
        tracing::info!(topic, source = self.source.name(), "monitoring started");

        loop {
            if cancel.is_cancelled() {
                tracing::info!(topic, "monitoring cancelled");
                return Ok(());
            }

            let delay = self.poll_once(topic).await?;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(topic, "monitoring cancelled during wait");
                    return Ok(());
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// One fetch/aggregate/report pass. Returns the wait before the next one.
    async fn poll_once(&mut self, topic: &str) -> Result<Duration, FetchError> {
        let batch = match self.source.fetch(topic).await {
            Ok(b) => b,
            Err(e) => {
                let kind = match &e {
                    FetchError::ClientRequest { .. } => "client",
                    FetchError::Server { .. } => "server",
                    FetchError::Transport(_) => "transport",
                    FetchError::Decode(_) => "decode",
                };
                counter!("monitor_fetch_errors_total", "kind" => kind).increment(1);
                tracing::error!(topic, error = %e, kind, "fetch failed, stopping");
                return Err(e);
            }
        };

        let fresh = self.stats.update(&batch.items);

        let snapshot = RankingSnapshot {
            topic: topic.to_string(),
            top_items: self.stats.top_items(self.show_limit),
            top_contributors: self.stats.top_contributors(self.show_limit),
        };
        self.reporter.show(&snapshot);

        let rl = batch.rate_limit;
        let delay = next_delay(&rl);

        counter!("monitor_polls_total").increment(1);
        counter!("monitor_new_items_total").increment(fresh as u64);
        gauge!("monitor_ratelimit_remaining").set(rl.remaining as f64);
        gauge!("monitor_ratelimit_reset_secs").set(rl.reset_secs as f64);

        if rl.is_exhausted() {
            tracing::warn!(
                topic,
                reset_secs = rl.reset_secs,
                wait_secs = delay.as_secs(),
                "rate limit exhausted, waiting for reset"
            );
        } else {
            tracing::info!(
                topic,
                fetched = batch.items.len(),
                new = fresh,
                tracked = self.stats.item_count(),
                remaining = rl.remaining,
                reset_secs = rl.reset_secs,
                wait_secs = delay.as_secs(),
                "poll cycle done"
            );
        }

        Ok(delay)
    }
}
