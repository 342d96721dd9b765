//! Integration tests for configuration management
//!
//! These tests verify that the Config struct can be loaded from a file,
//! overlaid with environment variables, and validated with path expansion.

use std::collections::HashMap;
use tempfile::TempDir;

use qotd_engine::config::{Config, ENV_API_KEY, ENV_DATA_DIR, ENV_MODELS, ENV_WEBHOOK};
use sdk::errors::EngineError;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_config_file_and_env_layering() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    let config_path = dir.path().join("qotd.toml");

    std::fs::write(
        &config_path,
        format!(
            r#"
[core]
log_level = "debug"
data_dir = "{}"
timezone = "America/New_York"

[storage]
history_window = 10
max_entries = 365

[llm]
models = ["from-file"]

[holidays]
enabled = false

[themes.novelty]
"7-17" = "World Emoji Day"

[notify]
footer = "Tell us below"
"#,
            data_dir.display()
        ),
    )
    .unwrap();

    let config = Config::load_with_env(
        Some(&config_path),
        env_from(&[
            (ENV_API_KEY, "secret-key"),
            (ENV_WEBHOOK, "https://discord.com/api/webhooks/1/t"),
            (ENV_MODELS, "model-a, model-b"),
        ]),
    )
    .unwrap();

    assert_eq!(config.core.log_level, "debug");
    assert_eq!(config.storage.history_window, 10);
    assert_eq!(config.storage.max_entries, Some(365));
    assert!(!config.holidays.enabled);
    assert_eq!(config.notify.footer, "Tell us below");
    assert_eq!(
        config.themes.novelty.get("7-17").map(String::as_str),
        Some("World Emoji Day")
    );

    // Environment wins over the file
    assert_eq!(config.llm.models, vec!["model-a", "model-b"]);
    assert_eq!(config.require_api_key().unwrap().unsecure(), "secret-key");
    assert!(config.notify.webhook_url.is_some());

    // data_dir is created during processing
    assert!(data_dir.is_dir());
    assert_eq!(config.history_path(), data_dir.join("question_history.json"));
    assert_eq!(config.question_path(), data_dir.join("current_question.txt"));
    assert_eq!(config.timezone().unwrap(), chrono_tz::America::New_York);
}

#[test]
fn test_env_data_dir_overrides_file() {
    let dir = TempDir::new().unwrap();
    let env_dir = dir.path().join("from-env");

    let config = Config::load_with_env(
        None,
        env_from(&[(ENV_DATA_DIR, env_dir.to_str().unwrap())]),
    )
    .unwrap();

    assert_eq!(config.core.data_dir, env_dir);
    assert!(env_dir.is_dir());
}

#[test]
fn test_missing_explicit_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = Config::load_with_env(Some(&missing), env_from(&[])).unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("qotd.toml");
    std::fs::write(&config_path, "[core\nlog_level = ").unwrap();

    let err = Config::load_with_env(Some(&config_path), env_from(&[])).unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
}

#[test]
fn test_data_dir_pointing_at_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("occupied");
    std::fs::write(&file, "x").unwrap();

    let err =
        Config::load_with_env(None, env_from(&[(ENV_DATA_DIR, file.to_str().unwrap())]))
            .unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
}

#[test]
fn test_no_api_key_loads_but_cannot_run() {
    let dir = TempDir::new().unwrap();

    let config = Config::load_with_env(
        None,
        env_from(&[(ENV_DATA_DIR, dir.path().to_str().unwrap()), (ENV_API_KEY, "  ")]),
    )
    .unwrap();

    assert!(matches!(
        config.require_api_key(),
        Err(EngineError::MissingCredential(_))
    ));
}
