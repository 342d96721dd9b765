//! Configuration management
//!
//! This module handles loading, validation, and management of the qotd
//! configuration. The configuration is built once at process start and passed
//! by reference into every component; nothing re-reads it mid-run.
//!
//! # Sources
//!
//! Lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config <PATH>`, or `./qotd.toml` when present)
//! 3. Environment variables (a `.env` file is loaded first by `main`)
//!
//! | Variable                   | Effect                                  |
//! |----------------------------|-----------------------------------------|
//! | `GEMINI_API_KEY`           | Provider credential                     |
//! | `DISCORD_QUESTION_WEBHOOK` | Notification address (optional)         |
//! | `QOTD_MODELS`              | Comma-separated candidate models        |
//! | `QOTD_DATA_DIR`            | Directory for the persisted files       |
//!
//! Secrets never come from the TOML file.
//!
//! # Examples
//!
//! ```no_run
//! use qotd_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None)?;
//! println!("Data dir: {:?}", config.core.data_dir);
//! println!("Models: {:?}", config.llm.models);
//! # Ok(())
//! # }
//! ```

use crate::secrets::SecretString;
use chrono_tz::Tz;
use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the provider credential
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable holding the webhook address
pub const ENV_WEBHOOK: &str = "DISCORD_QUESTION_WEBHOOK";
/// Environment variable overriding the candidate model list
pub const ENV_MODELS: &str = "QOTD_MODELS";
/// Environment variable overriding the data directory
pub const ENV_DATA_DIR: &str = "QOTD_DATA_DIR";

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "qotd.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Persisted files and history policy
    #[serde(default)]
    pub storage: StorageConfig,

    /// Generation provider settings
    #[serde(default)]
    pub llm: LLMConfig,

    /// Holiday lookup settings
    #[serde(default)]
    pub holidays: HolidaysConfig,

    /// Novelty-day additions
    #[serde(default)]
    pub themes: ThemesConfig,

    /// Notification settings
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory holding the question and history files (supports ~ expansion)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// IANA timezone that defines "today"
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Persisted state configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Current-question file name, relative to data_dir
    #[serde(default = "default_question_file")]
    pub question_file: PathBuf,

    /// History file name, relative to data_dir
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,

    /// Number of recent questions fed into the repetition-avoidance prompt
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Cap on stored entries. Unset keeps the full history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

/// Generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Candidate models, most preferred first
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub request_timeout_secs: u64,

    /// Gemini provider settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Provider credential, from the environment only
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL for Gemini API
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

/// Holiday lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidaysConfig {
    /// Query the holiday service at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the public-holiday API
    #[serde(default = "default_holidays_base_url")]
    pub base_url: String,

    /// ISO 3166-1 alpha-2 country code
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Lookup timeout in seconds
    #[serde(default = "default_holidays_timeout")]
    pub timeout_secs: u64,
}

/// Theme configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemesConfig {
    /// Extra novelty days keyed by "M-D" (e.g. "7-17" = "World Emoji Day").
    /// Entries override the built-in calendar.
    #[serde(default)]
    pub novelty: BTreeMap<String, String>,
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Embed accent color
    #[serde(default = "default_color")]
    pub color: u32,

    /// Embed footer text; empty disables the footer
    #[serde(default = "default_footer")]
    pub footer: String,

    /// Delivery timeout in seconds
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,

    /// Webhook address, from the environment only
    #[serde(skip)]
    pub webhook_url: Option<SecretString>,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

fn default_question_file() -> PathBuf {
    PathBuf::from("current_question.txt")
}

fn default_history_file() -> PathBuf {
    PathBuf::from("question_history.json")
}

fn default_history_window() -> usize {
    30
}

fn default_models() -> Vec<String> {
    vec![
        "gemini-2.5-flash".to_string(),
        "gemini-1.5-flash".to_string(),
    ]
}

fn default_llm_timeout() -> u64 {
    30
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_holidays_base_url() -> String {
    "https://date.nager.at/api/v3".to_string()
}

fn default_country_code() -> String {
    "US".to_string()
}

fn default_holidays_timeout() -> u64 {
    10
}

fn default_color() -> u32 {
    0x3498db
}

fn default_footer() -> String {
    "Reply in this thread to join the conversation!".to_string()
}

fn default_notify_timeout() -> u64 {
    15
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
            timezone: default_timezone(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            question_file: default_question_file(),
            history_file: default_history_file(),
            history_window: default_history_window(),
            max_entries: None,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            models: default_models(),
            request_timeout_secs: default_llm_timeout(),
            gemini: GeminiConfig::default(),
            api_key: None,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
        }
    }
}

impl Default for HolidaysConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_holidays_base_url(),
            country_code: default_country_code(),
            timeout_secs: default_holidays_timeout(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            footer: default_footer(),
            timeout_secs: default_notify_timeout(),
            webhook_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            storage: StorageConfig::default(),
            llm: LLMConfig::default(),
            holidays: HolidaysConfig::default(),
            themes: ThemesConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the file sources and the process environment
    ///
    /// With `path` set, that file must exist. Without it, `./qotd.toml` is
    /// used when present and the built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`], reading variables through `env`
    pub fn load_with_env<F>(path: Option<&Path>, env: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::read_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(env);
        config.validate_and_process()?;

        Ok(config)
    }

    /// Parse configuration from a TOML string, without environment or validation
    pub fn from_toml(contents: &str) -> Result<Self, EngineError> {
        toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))
    }

    fn read_file(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_toml(&contents)
    }

    /// Overlay environment variables. Blank values count as unset.
    pub fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank(ENV_API_KEY) {
            self.llm.api_key = Some(SecretString::new(key.trim()));
        }

        if let Some(url) = non_blank(ENV_WEBHOOK) {
            self.notify.webhook_url = Some(SecretString::new(url.trim()));
        }

        if let Some(models) = non_blank(ENV_MODELS) {
            self.llm.models = models
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
        }

        if let Some(dir) = non_blank(ENV_DATA_DIR) {
            self.core.data_dir = PathBuf::from(dir.trim());
        }
    }

    /// Validate and process configuration
    ///
    /// This method:
    /// - Validates field ranges and formats
    /// - Expands ~ in data_dir
    /// - Creates data_dir if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or data_dir cannot be created
    pub fn validate_and_process(&mut self) -> Result<(), EngineError> {
        self.validate()?;

        self.core.data_dir = expand_path(&self.core.data_dir)?;

        if !self.core.data_dir.exists() {
            fs::create_dir_all(&self.core.data_dir).map_err(|e| {
                EngineError::Config(format!("Failed to create data directory: {}", e))
            })?;
        }

        if !self.core.data_dir.is_dir() {
            return Err(EngineError::Config(format!(
                "data_dir is not a directory: {:?}",
                self.core.data_dir
            )));
        }

        Ok(())
    }

    /// Check every field without touching the file system
    pub fn validate(&self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        self.timezone()?;

        if self.llm.models.is_empty() {
            return Err(EngineError::Config(
                "llm.models must list at least one candidate model".to_string(),
            ));
        }
        if self.llm.models.iter().any(|m| m.trim().is_empty()) {
            return Err(EngineError::Config(
                "llm.models must not contain blank names".to_string(),
            ));
        }

        if self.storage.history_window == 0 {
            return Err(EngineError::Config(
                "storage.history_window must be greater than 0".to_string(),
            ));
        }
        if self.storage.max_entries == Some(0) {
            return Err(EngineError::Config(
                "storage.max_entries must be greater than 0 when set".to_string(),
            ));
        }

        for key in self.themes.novelty.keys() {
            crate::themes::novelty::parse_month_day(key).ok_or_else(|| {
                EngineError::Config(format!(
                    "Invalid novelty day key '{}'. Expected \"M-D\", e.g. \"3-14\"",
                    key
                ))
            })?;
        }

        for (name, secs) in [
            ("llm.request_timeout_secs", self.llm.request_timeout_secs),
            ("holidays.timeout_secs", self.holidays.timeout_secs),
            ("notify.timeout_secs", self.notify.timeout_secs),
        ] {
            if secs == 0 {
                return Err(EngineError::Config(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Parsed timezone
    pub fn timezone(&self) -> Result<Tz, EngineError> {
        self.core.timezone.parse::<Tz>().map_err(|_| {
            EngineError::Config(format!("Unknown timezone '{}'", self.core.timezone))
        })
    }

    /// Provider credential, or the fatal error for its absence
    pub fn require_api_key(&self) -> Result<&SecretString, EngineError> {
        self.llm
            .api_key
            .as_ref()
            .filter(|k| !k.is_blank())
            .ok_or_else(|| EngineError::MissingCredential(ENV_API_KEY.to_string()))
    }

    /// Absolute path of the current-question file
    pub fn question_path(&self) -> PathBuf {
        self.core.data_dir.join(&self.storage.question_file)
    }

    /// Absolute path of the history file
    pub fn history_path(&self) -> PathBuf {
        self.core.data_dir.join(&self.storage.history_file)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.request_timeout_secs)
    }

    pub fn holidays_timeout(&self) -> Duration {
        Duration::from_secs(self.holidays.timeout_secs)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify.timeout_secs)
    }
}

/// Expand ~ in path to user's home directory
fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}
