// src/config/reddit.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const ENV_CONFIG_PATH: &str = "REDDIT_MONITOR_CONFIG";
pub const ENV_ACCESS_TOKEN: &str = "REDDIT_ACCESS_TOKEN";

const DEFAULT_TOML: &str = "config/reddit_monitor.toml";
const DEFAULT_JSON: &str = "config/reddit_monitor.json";

fn default_topic() -> String {
    "funny".to_string()
}
fn default_request_limit() -> u32 {
    100
}
fn default_show_limit() -> usize {
    10
}
fn default_base_url() -> String {
    "https://oauth.reddit.com".to_string()
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("critical configuration value `{0}` is missing")]
    Missing(&'static str),
    #[error("`{field}` is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Settings for the monitor. JSON files may use the PascalCase keys
/// (`ClientId`, `AccessToken`, ...) as well.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    #[serde(default, alias = "ClientId")]
    pub client_id: String,
    #[serde(default, alias = "RedirectUri")]
    pub redirect_uri: String,
    #[serde(default, alias = "UserAgent")]
    pub user_agent: String,
    /// Bearer token. "ENV" means: read from `REDDIT_ACCESS_TOKEN`.
    #[serde(default, alias = "AccessToken")]
    pub access_token: String,
    /// Subreddit to watch.
    #[serde(default = "default_topic", alias = "Subreddit")]
    pub topic: String,
    /// Posts per request (`limit=` query parameter).
    #[serde(default = "default_request_limit", alias = "RequestLimit")]
    pub request_limit: u32,
    /// Rows per ranking in each report.
    #[serde(default = "default_show_limit", alias = "ShowLimit")]
    pub show_limit: usize,
    #[serde(default = "default_base_url", alias = "BaseUrl")]
    pub base_url: String,
    /// Prometheus listener; no exporter when absent.
    #[serde(default, alias = "MetricsAddr")]
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            redirect_uri: String::new(),
            user_agent: String::new(),
            access_token: String::new(),
            topic: default_topic(),
            request_limit: default_request_limit(),
            show_limit: default_show_limit(),
            base_url: default_base_url(),
            metrics_addr: None,
        }
    }
}

impl MonitorConfig {
    /// Check the values the feed source cannot run without.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let required = [
            ("client_id", &self.client_id),
            ("redirect_uri", &self.redirect_uri),
            ("user_agent", &self.user_agent),
            ("access_token", &self.access_token),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(name));
            }
        }
        if self.topic.trim().is_empty() {
            return Err(ConfigError::Missing("topic"));
        }
        if !is_subreddit_name(&self.topic) {
            return Err(ConfigError::Invalid {
                field: "topic",
                reason: format!("{:?} is not a subreddit name", self.topic),
            });
        }
        if !(1..=100).contains(&self.request_limit) {
            return Err(ConfigError::Invalid {
                field: "request_limit",
                reason: format!("{} is outside 1..=100", self.request_limit),
            });
        }
        Ok(())
    }

    /// Replace an "ENV" access token with `$REDDIT_ACCESS_TOKEN` (empty if unset).
    fn resolve_env(mut self) -> Self {
        if self.access_token.trim().eq_ignore_ascii_case("env") {
            self.access_token = env::var(ENV_ACCESS_TOKEN).unwrap_or_default();
        }
        self.topic = self.topic.trim().trim_start_matches("r/").to_string();
        self
    }
}

/// Letters, digits and underscores only; the topic is spliced into the URL path.
fn is_subreddit_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Load configuration from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<MonitorConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let cfg = parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg.resolve_env())
}

/// Load configuration using env var + fallbacks:
/// 1) $REDDIT_MONITOR_CONFIG
/// 2) config/reddit_monitor.toml
/// 3) config/reddit_monitor.json
pub fn load_default() -> Result<MonitorConfig> {
    if let Ok(p) = env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    for candidate in [DEFAULT_TOML, DEFAULT_JSON] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return load_from(&p);
        }
    }
    Err(anyhow!(
        "no configuration found: set {ENV_CONFIG_PATH} or create {DEFAULT_TOML}"
    ))
}

fn parse_config(s: &str, hint_ext: &str) -> Result<MonitorConfig> {
    // JSON documents open with a brace; everything else is tried as TOML first.
    let looks_json = hint_ext == "json" || s.trim_start().starts_with('{');
    if looks_json {
        return serde_json::from_str(s).context("invalid JSON config");
    }
    match toml::from_str(s) {
        Ok(cfg) => Ok(cfg),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!("unsupported config format: {toml_err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_with_defaults() {
        let cfg = parse_config(
            r#"
client_id = "cid"
redirect_uri = "http://localhost:8080"
user_agent = "monitor/0.1"
access_token = "tok"
"#,
            "toml",
        )
        .unwrap();
        assert_eq!(cfg.topic, "funny");
        assert_eq!(cfg.request_limit, 100);
        assert_eq!(cfg.show_limit, 10);
        assert!(cfg.metrics_addr.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn json_accepts_pascal_case_keys() {
        let cfg = parse_config(
            r#"{"ClientId":"cid","RedirectUri":"http://x","UserAgent":"ua","AccessToken":"t","Subreddit":"rust"}"#,
            "",
        )
        .unwrap();
        assert_eq!(cfg.client_id, "cid");
        assert_eq!(cfg.topic, "rust");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_or_blank_required_values_are_reported() {
        let mut cfg = MonitorConfig {
            client_id: "cid".into(),
            redirect_uri: "http://x".into(),
            user_agent: "  ".into(),
            access_token: "t".into(),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::Missing("user_agent")));
        cfg.user_agent = "ua".into();
        cfg.request_limit = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid {
                field: "request_limit",
                ..
            })
        ));

        cfg.request_limit = 100;
        for bad in ["fun?ny", "a/b", "rust lang", "x#y", "../admin"] {
            cfg.topic = bad.into();
            assert!(
                matches!(cfg.validate(), Err(ConfigError::Invalid { field: "topic", .. })),
                "{bad} accepted"
            );
        }
        cfg.topic = "rust_gamedev".into();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_config("this is = = not config", "").is_err());
    }
}
