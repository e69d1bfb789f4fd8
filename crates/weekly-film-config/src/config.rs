use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://qqlykm.cn/api/jijiangshangying/get";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 86_400; // 24 hours
pub const DEFAULT_SCROLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be at least 1 second (got {value})")]
    IntervalTooShort { field: &'static str, value: u64 },
    #[error("api.base_url must be an http(s) URL (got {0:?})")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchedulerConfig {
    #[serde(default = "default_refresh_interval_seconds")]
    pub refresh_interval_seconds: u64,
    #[serde(default = "default_scroll_interval_seconds")]
    pub scroll_interval_seconds: u64,
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

fn default_true() -> bool {
    true
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_refresh_interval_seconds() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

fn default_scroll_interval_seconds() -> u64 {
    DEFAULT_SCROLL_INTERVAL_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: default_refresh_interval_seconds(),
            scroll_interval_seconds: default_scroll_interval_seconds(),
            run_on_startup: default_true(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl SchedulerConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    pub fn scroll_interval(&self) -> Duration {
        Duration::from_secs(self.scroll_interval_seconds)
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.api.base_url.clone()));
        }

        let intervals = [
            ("api.timeout_seconds", self.api.timeout_seconds),
            ("scheduler.refresh_interval_seconds", self.scheduler.refresh_interval_seconds),
            ("scheduler.scroll_interval_seconds", self.scheduler.scroll_interval_seconds),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(ConfigError::IntervalTooShort { field, value });
            }
        }

        Ok(())
    }
}
