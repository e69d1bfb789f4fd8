pub mod config;
pub mod daemon;
pub mod fetch;
pub mod prompts;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use weekly_film_config::{Config, CredentialStore, PathManager};

/// Config and credentials as the commands see them on disk.
pub(crate) fn load_settings(path_manager: &PathManager) -> Result<(Config, CredentialStore)> {
    let config_file = path_manager.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let credentials_file = path_manager.credentials_file();
    let mut credentials = CredentialStore::new(credentials_file.clone());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

    Ok((config, credentials))
}
