//! Feed creation from configuration.
//!
//! Resolves the API key (explicit override, then `WEEKLYFILM_API_KEY`, then
//! the credential store) and builds the configured feed client.

use anyhow::{anyhow, Result};
use weekly_film_config::{Config, CredentialStore, API_KEY_ENV};
use crate::qqlykm::QqlykmClient;
use crate::FilmFeed;

pub fn resolve_api_key(credentials: &CredentialStore, api_key_override: Option<String>) -> Result<String> {
    let env_key = std::env::var(API_KEY_ENV).ok();
    pick_api_key(api_key_override, env_key, credentials.get_api_key().cloned())
}

/// First non-blank key among the override, the environment and the store.
fn pick_api_key(
    api_key_override: Option<String>,
    env_key: Option<String>,
    stored_key: Option<String>,
) -> Result<String> {
    [api_key_override, env_key, stored_key]
        .into_iter()
        .flatten()
        .find(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            anyhow!(
                "No API key configured. Run `weeklyfilm config set --api-key <KEY>` or set {}",
                API_KEY_ENV
            )
        })
}

pub fn create_feed(
    config: &Config,
    credentials: &CredentialStore,
    api_key_override: Option<String>,
) -> Result<Box<dyn FilmFeed>> {
    config.validate()?;
    let api_key = resolve_api_key(credentials, api_key_override)?;
    let client = QqlykmClient::from_config(&config.api, api_key)?;
    Ok(Box::new(client))
}
