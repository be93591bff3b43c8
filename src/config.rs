pub mod appconfig;
pub mod keybindings;
pub mod notificationconfig;
pub mod pathconfig;

use color_eyre::{eyre::eyre, Result};
use keybindings::KeyBindings;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    action::Action,
    config::{
        appconfig::AppConfig,
        notificationconfig::NotificationConfig,
        pathconfig::{ConfigSource, PathConfig},
    },
};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings<Action>,
    #[serde(default)]
    pub notification: NotificationConfig,
}

impl Config {
    pub fn new(paths: PathConfig) -> Result<Self> {
        let default_config: Config = json5::from_str(CONFIG)
            .map_err(|e| eyre!("Failed to parse the built-in config: {}", e))?;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        match &paths.config {
            ConfigSource::Dir(config_dir) => {
                let config_files = [
                    ("config.json5", config::FileFormat::Json5),
                    ("config.json", config::FileFormat::Json),
                    ("config.yaml", config::FileFormat::Yaml),
                    ("config.toml", config::FileFormat::Toml),
                    ("config.ini", config::FileFormat::Ini),
                ];
                let mut found_config = false;
                for (file, format) in &config_files {
                    let source = config::File::from(config_dir.join(file))
                        .format(*format)
                        .required(false);
                    builder = builder.add_source(source);
                    if config_dir.join(file).exists() {
                        info!("Loading config from {:?}", config_dir.join(file));
                        found_config = true;
                    }
                }
                if !found_config {
                    warn!(
                        "No configuration file found in {:?}, using defaults",
                        config_dir
                    );
                }
            }
            ConfigSource::None => info!("User config disabled, using defaults"),
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        // User bindings win, defaults fill in the rest
        cfg.keybindings.merge_missing(&default_config.keybindings);

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::config::appconfig::DEFAULT_BASE_URL;

    fn no_config() -> PathConfig {
        PathConfig::new(Some(".data".to_string()), None, true)
    }

    #[test]
    fn test_default_config() -> Result<()> {
        let c = Config::new(no_config())?;
        assert_eq!(c.config.base_url, DEFAULT_BASE_URL);
        assert_eq!(c.notification.short_ms, 2000);
        assert_eq!(c.notification.long_ms, 3500);
        let bound_action = c
            .keybindings
            .get(&KeyBindings::<Action>::parse_key_sequence("<Ctrl-c>").unwrap_or_default());
        assert_eq!(bound_action, Some(&Action::Quit));
        Ok(())
    }

    #[test]
    fn test_empty_config() {
        let c = Config::default();
        assert!(c.keybindings.is_empty());
        assert_eq!(c.config.base_url, DEFAULT_BASE_URL);
        assert_eq!(c.notification.long_ms, 3500);
    }

    #[test]
    fn test_user_config_overrides() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("config.json5"),
            r#"{
                base_url: "https://attendance.example.com/api/",
                notification: { long_ms: 10000 },
                keybindings: { "<Ctrl-c>": "Suspend", "<Ctrl-q>": "Quit" },
            }"#,
        )?;
        let c = Config::new(PathConfig::new(
            Some(".data".to_string()),
            dir.path().to_str().map(str::to_string),
            false,
        ))?;
        assert_eq!(c.config.base_url, "https://attendance.example.com/api/");
        assert_eq!(c.notification.long_ms, 10000);
        assert_eq!(c.notification.short_ms, 2000);
        let ctrl = |ch| vec![KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)];
        assert_eq!(c.keybindings.get(&ctrl('c')), Some(&Action::Suspend));
        assert_eq!(c.keybindings.get(&ctrl('q')), Some(&Action::Quit));
        // Untouched default
        assert_eq!(c.keybindings.get(&ctrl('z')), Some(&Action::Suspend));
        Ok(())
    }

    #[test]
    fn test_missing_config_dir_uses_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let c = Config::new(PathConfig::new(
            Some(".data".to_string()),
            dir.path().join("nope").to_str().map(str::to_string),
            false,
        ))?;
        assert_eq!(c.config.base_url, DEFAULT_BASE_URL);
        Ok(())
    }
}
