// src/ingest/types.rs
use chrono::{DateTime, Utc};

use crate::ingest::ratelimit::RateLimitSnapshot;

/// One post as seen on the listing, validated at the ingestion boundary.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FeedItem {
    pub id: String,          // e.g. "1a2b3c"
    pub contributor: String, // post author
    pub title: String,       // normalized title
    pub score: i64,          // upvotes at fetch time
    pub created_at: DateTime<Utc>,
}

/// Result of one successful fetch: the items plus the rate-limit state
/// reported by that same response.
#[derive(Debug, Clone, Default)]
pub struct FeedBatch {
    pub items: Vec<FeedItem>,
    pub rate_limit: RateLimitSnapshot,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// 4xx-class answer: bad topic, bad credential or bad parameters.
    #[error("client error {status}: check the request parameters ({body})")]
    ClientRequest { status: u16, body: String },

    /// 5xx-class answer: remote fault, possibly transient.
    #[error("server error {status}: try again later ({body})")]
    Server { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed listing: {0}")]
    Decode(String),
}

impl FetchError {
    /// HTTP status carried by the error, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::ClientRequest { status, .. } | FetchError::Server { status, .. } => {
                Some(*status)
            }
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
            FetchError::Decode(_) => None,
        }
    }
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, topic: &str) -> Result<FeedBatch, FetchError>;
    fn name(&self) -> &'static str;
}
