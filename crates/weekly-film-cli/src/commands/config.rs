use crate::commands::load_settings;
use crate::commands::prompts::{prompt_password, prompt_seconds, prompt_string, prompt_yes_no};
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use weekly_film_config::{Config, CredentialStore, PathManager, API_KEY_ENV};

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    match cmd {
        ConfigCommands::Show { full } => show_config(&path_manager, full, output),
        ConfigCommands::Set {
            api_key,
            scroll_interval,
            refresh_interval,
            base_url,
        } => set_config(
            &path_manager,
            ConfigUpdate {
                api_key,
                scroll_interval,
                refresh_interval,
                base_url,
            },
            output,
        ),
        ConfigCommands::Init => run_interactive_config(&path_manager, output),
    }
}

fn show_config(path_manager: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();
    let (config, credentials) = load_settings(path_manager)?;

    let api_key = credentials.resolve_api_key().unwrap_or_default();
    let api_key_display = if full && !api_key.is_empty() {
        api_key
    } else {
        mask_string(&api_key)
    };

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "api_key": api_key_display,
            "api": config.api,
            "scheduler": config.scheduler,
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!(
            "Configuration file not found at {}; showing defaults",
            config_file.display()
        ));
    }

    println!();
    println!("{}", "Configuration".bright_cyan().bold());
    println!();

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Config File"), Cell::new(config_file.display().to_string())]);
    table.add_row(vec![Cell::new("API Key"), Cell::new(api_key_display)]);
    table.add_row(vec![Cell::new("API URL"), Cell::new(&config.api.base_url)]);
    table.add_row(vec![
        Cell::new("Request Timeout"),
        Cell::new(format!("{}s", config.api.timeout_seconds)),
    ]);
    table.add_row(vec![
        Cell::new("Refresh Interval"),
        Cell::new(format!("{}s", config.scheduler.refresh_interval_seconds)),
    ]);
    table.add_row(vec![
        Cell::new("Scroll Interval"),
        Cell::new(format!("{}s", config.scheduler.scroll_interval_seconds)),
    ]);
    table.add_row(vec![
        Cell::new("Refresh On Startup"),
        Cell::new(if config.scheduler.run_on_startup { "yes" } else { "no" }),
    ]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);

    if std::env::var(API_KEY_ENV).is_ok() {
        output.info(format!("API key taken from {}", API_KEY_ENV));
    }

    Ok(())
}

#[derive(Debug, Default)]
struct ConfigUpdate {
    api_key: Option<String>,
    scroll_interval: Option<u64>,
    refresh_interval: Option<u64>,
    base_url: Option<String>,
}

impl ConfigUpdate {
    fn is_empty(&self) -> bool {
        self.api_key.is_none()
            && self.scroll_interval.is_none()
            && self.refresh_interval.is_none()
            && self.base_url.is_none()
    }

    /// Apply the non-key settings and validate the result. `config` is left
    /// untouched when validation fails.
    fn apply(&self, config: &mut Config) -> Result<()> {
        let mut updated = config.clone();
        if let Some(seconds) = self.scroll_interval {
            updated.scheduler.scroll_interval_seconds = seconds;
        }
        if let Some(seconds) = self.refresh_interval {
            updated.scheduler.refresh_interval_seconds = seconds;
        }
        if let Some(url) = &self.base_url {
            updated.api.base_url = url.trim().to_string();
        }
        updated
            .validate()
            .map_err(|e| eyre!("Invalid configuration: {}", e))?;
        *config = updated;
        Ok(())
    }
}

fn set_config(path_manager: &PathManager, update: ConfigUpdate, output: &Output) -> Result<()> {
    if update.is_empty() {
        output.warn("Nothing to update. Pass --api-key, --scroll-interval, --refresh-interval or --base-url.");
        return Ok(());
    }

    let (mut config, mut credentials) = load_settings(path_manager)?;
    update.apply(&mut config)?;

    if let Some(api_key) = &update.api_key {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(eyre!("API key cannot be empty"));
        }
        save_api_key(&mut credentials, api_key.to_string())?;
    }
    save_config(path_manager, &config)?;

    output.success("Configuration saved");
    if update.scroll_interval.is_some() {
        output.info("Send SIGHUP to a running daemon to apply the new scroll interval.");
    }
    Ok(())
}

fn run_interactive_config(path_manager: &PathManager, output: &Output) -> Result<()> {
    let (mut config, mut credentials) = load_settings(path_manager)?;

    output.println("");
    output.println(format!("{}", "WeeklyFilm setup".bold().bright_cyan()));
    output.println(format!("{}", "─".repeat(16).bright_cyan()));

    let existing_key = credentials.get_api_key().cloned();
    let prompt = match &existing_key {
        Some(key) => format!("API key [{}] (leave blank to keep)", mask_string(key)),
        None => "API key".to_string(),
    };
    let api_key = loop {
        let entered = prompt_password(&prompt)?;
        let entered = entered.trim();
        match (entered.is_empty(), &existing_key) {
            (false, _) => break entered.to_string(),
            (true, Some(key)) => break key.clone(),
            (true, None) => output.error("An API key is required."),
        }
    };

    let scroll_interval = prompt_seconds(
        "Scroll interval (seconds)",
        config.scheduler.scroll_interval_seconds,
        output,
    )?;

    let mut update = ConfigUpdate {
        scroll_interval: Some(scroll_interval),
        ..ConfigUpdate::default()
    };
    if prompt_yes_no("Change advanced settings (API URL, refresh interval)?", false)? {
        update.base_url = Some(prompt_string("API URL", Some(&config.api.base_url))?);
        update.refresh_interval = Some(prompt_seconds(
            "Refresh interval (seconds)",
            config.scheduler.refresh_interval_seconds,
            output,
        )?);
    }
    update.apply(&mut config)?;

    save_api_key(&mut credentials, api_key)?;
    save_config(path_manager, &config)?;

    output.success(format!(
        "Configuration saved to {}",
        path_manager.config_file().display()
    ));
    Ok(())
}

fn save_config(path_manager: &PathManager, config: &Config) -> Result<()> {
    let config_file = path_manager.config_file();
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))
}

fn save_api_key(credentials: &mut CredentialStore, api_key: String) -> Result<()> {
    credentials.set_api_key(api_key);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abcd"), "****");
        assert_eq!(mask_string("abcdef123456"), "ab***56");
    }

    #[test]
    fn test_update_applies_fields() {
        let mut config = Config::default();
        let update = ConfigUpdate {
            scroll_interval: Some(15),
            refresh_interval: Some(3600),
            base_url: Some(" http://localhost:8080/get ".to_string()),
            ..ConfigUpdate::default()
        };
        update.apply(&mut config).unwrap();
        assert_eq!(config.scheduler.scroll_interval_seconds, 15);
        assert_eq!(config.scheduler.refresh_interval_seconds, 3600);
        assert_eq!(config.api.base_url, "http://localhost:8080/get");
    }

    #[test]
    fn test_invalid_update_leaves_config_untouched() {
        let mut config = Config::default();
        let update = ConfigUpdate {
            scroll_interval: Some(0),
            ..ConfigUpdate::default()
        };
        assert!(update.apply(&mut config).is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_update() {
        assert!(ConfigUpdate::default().is_empty());
        let update = ConfigUpdate {
            api_key: Some("key".to_string()),
            ..ConfigUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_set_config_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let path_manager = PathManager::with_base(dir.path().to_path_buf());
        let output = Output::new(crate::output::OutputFormat::Json, true);

        let update = ConfigUpdate {
            api_key: Some("secret-key".to_string()),
            scroll_interval: Some(30),
            ..ConfigUpdate::default()
        };
        set_config(&path_manager, update, &output).unwrap();

        let (config, credentials) = load_settings(&path_manager).unwrap();
        assert_eq!(config.scheduler.scroll_interval_seconds, 30);
        assert_eq!(credentials.get_api_key().map(String::as_str), Some("secret-key"));
    }
}
