use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::DEFAULT_PATH_SEPARATOR;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Catalog used when a command is not given one explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    /// Directory holding the reversal-index configuration files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reversal_dir: Option<PathBuf>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_path_separator")]
    pub path_separator: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_path_separator() -> String {
    DEFAULT_PATH_SEPARATOR.to_string()
}

fn default_log_file() -> String {
    "lexicon-config.log".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            path_separator: default_path_separator(),
            log_file: default_log_file(),
        }
    }
}

/// Names accepted by `settings get/set/reset`
pub const SETTING_NAMES: [&str; 4] = ["catalog", "reversal-dir", "path-separator", "log-file"];

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("lexicon-config")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".lexicon-config")
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<String> {
        let value = match name {
            "catalog" => display_path(&self.catalog),
            "reversal-dir" => display_path(&self.reversal_dir),
            "path-separator" => format!("{:?}", self.settings.path_separator),
            "log-file" => self.settings.log_file.clone(),
            _ => anyhow::bail!("Unknown setting: {}", name),
        };
        Ok(value)
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        info!("Setting {} to: {}", name, value);
        match name {
            "catalog" => self.catalog = Some(PathBuf::from(value)),
            "reversal-dir" => self.reversal_dir = Some(PathBuf::from(value)),
            "path-separator" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Path separator must contain a visible character");
                }
                self.settings.path_separator = value.to_string();
            }
            "log-file" => self.settings.log_file = value.to_string(),
            _ => anyhow::bail!("Unknown setting: {}", name),
        }
        Ok(())
    }

    pub fn reset(&mut self, name: &str) -> Result<()> {
        let defaults = Config::default();
        match name {
            "catalog" => self.catalog = defaults.catalog,
            "reversal-dir" => self.reversal_dir = defaults.reversal_dir,
            "path-separator" => self.settings.path_separator = defaults.settings.path_separator,
            "log-file" => self.settings.log_file = defaults.settings.log_file,
            _ => anyhow::bail!("Unknown setting: {}", name),
        }
        Ok(())
    }

    pub fn reset_all(&mut self) {
        *self = Config::default();
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.settings.path_separator, " > ");
    }

    #[test]
    fn test_set_and_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("path-separator", " / ").unwrap();
        config.set("reversal-dir", "/tmp/reversals").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.settings.path_separator, " / ");
        assert_eq!(loaded.get("reversal-dir").unwrap(), "/tmp/reversals");
    }

    #[test]
    fn test_unknown_and_blank_settings_are_rejected() {
        let mut config = Config::default();
        assert!(config.set("colour", "blue").is_err());
        assert!(config.set("path-separator", "   ").is_err());
        assert!(config.get("colour").is_err());
    }

    #[test]
    fn test_reset_restores_default() {
        let mut config = Config::default();
        config.set("log-file", "other.log").unwrap();
        config.reset("log-file").unwrap();
        assert_eq!(config.settings.log_file, "lexicon-config.log");
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let config: Config = toml::from_str(
            r#"
            [settings]
            log_file = "custom.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.settings.path_separator, " > ");
        assert_eq!(config.settings.log_file, "custom.log");
    }
}
