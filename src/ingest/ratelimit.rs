//! # Rate-limit window
//! Turns the remote's rate-limit headers into a [`RateLimitSnapshot`] and the
//! snapshot into the wait before the next request.
//!
//! The buffered interval spreads the remaining budget evenly over the time
//! left in the window: `reset / remaining + 1` seconds. With the budget
//! exhausted the poller sleeps out the reset, never less than [`MIN_DELAY`].

use reqwest::header::HeaderMap;
use std::time::Duration;

pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET: &str = "x-ratelimit-reset";
pub const HEADER_USED: &str = "x-ratelimit-used";

/// Floor for the exhausted-budget wait, so a zero reset cannot busy-loop.
pub const MIN_DELAY: Duration = Duration::from_secs(1);

/// Rate-limit state reported by a single response. Valid for one cycle only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    /// Requests left in the current window.
    pub remaining: u64,
    /// Seconds until the window resets.
    pub reset_secs: u64,
    /// Requests already spent, when the remote reports it.
    pub used: Option<u64>,
}

impl RateLimitSnapshot {
    pub fn new(remaining: u64, reset_secs: u64) -> Self {
        Self {
            remaining,
            reset_secs,
            used: None,
        }
    }

    /// Read the snapshot from response headers. Absent or unparsable values read as 0.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        Self {
            remaining: get(HEADER_REMAINING).map(parse_count).unwrap_or(0),
            reset_secs: get(HEADER_RESET).map(parse_count).unwrap_or(0),
            used: get(HEADER_USED).map(parse_count),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Parse a header count. Reddit sends decimals such as `"596.0"`.
pub fn parse_count(raw: &str) -> u64 {
    let s = raw.trim();
    if let Ok(n) = s.parse::<u64>() {
        return n;
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => f.round() as u64,
        _ => 0,
    }
}

/// Wait before the next fetch, derived from the last response's snapshot.
pub fn next_delay(rl: &RateLimitSnapshot) -> Duration {
    if rl.is_exhausted() {
        Duration::from_secs(rl.reset_secs).max(MIN_DELAY)
    } else {
        Duration::from_secs(rl.reset_secs / rl.remaining + 1)
    }
}
