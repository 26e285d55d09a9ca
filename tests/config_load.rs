// tests/config_load.rs
use reddit_monitor::config::{load_default, load_from, ConfigError};
use std::{env, fs};

const TOML_CFG: &str = r#"
client_id = "cid"
redirect_uri = "http://localhost:8080/callback"
user_agent = "windows:reddit-monitor:v0.1 (by /u/someone)"
access_token = "tok-toml"
topic = "r/rust"
show_limit = 5
metrics_addr = "127.0.0.1:9464"
"#;

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("reddit_monitor.toml");
    fs::write(&p_toml, TOML_CFG).unwrap();
    let t = load_from(&p_toml).unwrap();
    assert_eq!(t.access_token, "tok-toml");
    assert_eq!(t.topic, "rust");
    assert_eq!(t.show_limit, 5);
    assert_eq!(t.request_limit, 100);
    assert_eq!(t.metrics_addr, Some("127.0.0.1:9464".parse().unwrap()));
    assert!(t.validate().is_ok());

    // appsettings-style JSON with PascalCase keys, no extension hint
    let p_json = dir.path().join("appsettings");
    fs::write(
        &p_json,
        r#"{"ClientId":"cid","RedirectUri":"http://localhost","UserAgent":"ua","AccessToken":""}"#,
    )
    .unwrap();
    let j = load_from(&p_json).unwrap();
    assert_eq!(j.client_id, "cid");
    assert_eq!(j.topic, "funny");
    assert_eq!(j.validate(), Err(ConfigError::Missing("access_token")));
}

#[test]
fn unreadable_or_malformed_files_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_from(&dir.path().join("absent.toml")).is_err());

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    assert!(load_from(&bad).is_err());
}

#[serial_test::serial]
#[test]
fn access_token_env_indirection() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("cfg.toml");
    fs::write(
        &p,
        r#"
client_id = "cid"
redirect_uri = "http://localhost"
user_agent = "ua"
access_token = "ENV"
"#,
    )
    .unwrap();

    env::set_var("REDDIT_ACCESS_TOKEN", "from-env");
    assert_eq!(load_from(&p).unwrap().access_token, "from-env");

    env::remove_var("REDDIT_ACCESS_TOKEN");
    let cfg = load_from(&p).unwrap();
    assert!(cfg.access_token.is_empty());
    assert_eq!(cfg.validate(), Err(ConfigError::Missing("access_token")));
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // isolate CWD so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var("REDDIT_MONITOR_CONFIG");

    // 1) nothing at all -> error
    assert!(load_default().is_err());

    // 2) fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("reddit_monitor.toml"), TOML_CFG).unwrap();
    assert_eq!(load_default().unwrap().access_token, "tok-toml");

    // 3) env var wins
    let p_env = tmp.path().join("other.json");
    fs::write(
        &p_env,
        r#"{"client_id":"c","redirect_uri":"r","user_agent":"u","access_token":"tok-env"}"#,
    )
    .unwrap();
    env::set_var("REDDIT_MONITOR_CONFIG", p_env.display().to_string());
    assert_eq!(load_default().unwrap().access_token, "tok-env");

    // 4) env var pointing nowhere is an error, not a silent fallback
    env::set_var("REDDIT_MONITOR_CONFIG", tmp.path().join("missing.toml"));
    assert!(load_default().is_err());
    env::remove_var("REDDIT_MONITOR_CONFIG");

    env::set_current_dir(&old).unwrap();
}
