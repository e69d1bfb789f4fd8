pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{
    ApiConfig, Config, ConfigError, SchedulerConfig, DEFAULT_API_URL, DEFAULT_REFRESH_INTERVAL_SECS,
    DEFAULT_SCROLL_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS,
};
pub use credentials::{CredentialStore, API_KEY_ENV};
pub use paths::{container_base_path, PathManager};
