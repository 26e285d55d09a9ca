// src/ingest/providers/reddit.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};

use crate::config::{ConfigError, MonitorConfig};
use crate::ingest::normalize_title;
use crate::ingest::ratelimit::RateLimitSnapshot;
use crate::ingest::types::{FeedBatch, FeedItem, FeedSource, FetchError};

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: RawPost,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    id: Option<String>,
    author: Option<String>,
    title: Option<String>,
    ups: Option<f64>,
    created_utc: Option<f64>,
}

impl RawPost {
    fn into_item(self) -> Option<FeedItem> {
        let id = self.id.filter(|s| !s.trim().is_empty())?;
        let contributor = self.author.filter(|s| !s.trim().is_empty())?;
        let title = normalize_title(&self.title?);
        let score = self.ups.filter(|f| f.is_finite())?.round() as i64;
        let created_at = DateTime::<Utc>::from_timestamp(self.created_utc?.floor() as i64, 0)?;
        Some(FeedItem {
            id,
            contributor,
            title,
            score,
            created_at,
        })
    }
}

/// Decoded `new.json` listing.
#[derive(Debug, Default)]
pub struct ParsedListing {
    pub items: Vec<FeedItem>,
    /// Children dropped for missing or malformed fields.
    pub skipped: usize,
}

/// Decode a listing body. Bad children are skipped; a bad envelope is an error.
pub fn parse_listing(body: &str) -> Result<ParsedListing, FetchError> {
    let listing: Listing =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let mut out = ParsedListing::default();
    for raw in listing.data.children {
        let item = serde_json::from_value::<Child>(raw)
            .ok()
            .and_then(|c| c.data.into_item());
        match item {
            Some(it) => out.items.push(it),
            None => out.skipped += 1,
        }
    }
    if out.skipped > 0 {
        tracing::warn!(skipped = out.skipped, "listing entries missing required fields");
    }
    Ok(out)
}

fn classify(status: StatusCode, body: String) -> FetchError {
    let code = status.as_u16();
    if status.is_server_error() {
        tracing::error!(status = code, %body, "server error");
        FetchError::Server { status: code, body }
    } else {
        tracing::error!(status = code, %body, "client error");
        FetchError::ClientRequest { status: code, body }
    }
}

/// Reads `/r/{topic}/new.json` from the OAuth API host.
pub struct RedditSource {
    client: Client,
    base_url: String,
    access_token: String,
    request_limit: u32,
    timeout: Option<Duration>,
}

impl RedditSource {
    /// Fails before any request when a required credential/identifier is blank.
    pub fn new(cfg: &MonitorConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let client = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::Invalid {
                field: "user_agent",
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            access_token: cfg.access_token.clone(),
            request_limit: cfg.request_limit,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    pub fn listing_url(&self, topic: &str) -> String {
        format!("{}/r/{}/new.json", self.base_url, topic)
    }
}

#[async_trait]
impl FeedSource for RedditSource {
    async fn fetch(&self, topic: &str) -> Result<FeedBatch, FetchError> {
        let t0 = Instant::now();

        let mut req = self
            .client
            .get(self.listing_url(topic))
            .query(&[("limit", self.request_limit)])
            .bearer_auth(&self.access_token);
        if let Some(t) = self.timeout {
            req = req.timeout(t);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let rate_limit = RateLimitSnapshot::from_headers(resp.headers());
        tracing::debug!(
            status = status.as_u16(),
            request_limit = self.request_limit,
            remaining = rate_limit.remaining,
            reset_secs = rate_limit.reset_secs,
            used = ?rate_limit.used,
            "listing response"
        );

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify(status, body));
        }

        let body = resp.text().await?;
        let parsed = parse_listing(&body)?;

        histogram!("monitor_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("monitor_items_fetched_total").increment(parsed.items.len() as u64);
        counter!("monitor_items_skipped_total").increment(parsed.skipped as u64);

        Ok(FeedBatch {
            items: parsed.items,
            rate_limit,
        })
    }

    fn name(&self) -> &'static str {
        "Reddit"
    }
}
