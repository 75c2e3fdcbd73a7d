use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::path::PathBuf;

pub const APP_DIR: &str = ".hms-keypad";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PickerConfig {
    /// Three-digit `h:mm` entry instead of `h:mm:ss`
    #[serde(default)]
    pub hide_seconds: bool,
    /// Theme id saved alongside the entered digits
    #[serde(default)]
    pub theme: Option<String>,
    /// Reject out-of-range values in `set` instead of truncating them
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct StateConfig {
    /// Optional override for state directory (for testing)
    pub state_dir_override: Option<PathBuf>,
}

impl PickerConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(theme) = &self.theme {
            if theme.trim().is_empty() {
                anyhow::bail!("picker.theme must not be empty; remove the key to use no theme");
            }
        }
        Ok(())
    }
}

impl Config {
    /// Validate all configuration
    pub fn validate(&self) -> Result<()> {
        self.picker.validate()?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let config_dir = home::home_dir()
        .context("Could not find home directory")?
        .join(APP_DIR);
    Ok(config_dir.join("config.toml"))
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let loader = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .build()
        .context("Failed to build config loader")?;

    loader
        .try_deserialize()
        .context("Failed to parse config file")
}

/// Load `~/.hms-keypad/config.toml`, or defaults when it does not exist.
pub fn load() -> Result<Config> {
    let config_path = config_path()?;
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config = load_from_path(&config_path)?;
    config.validate()?;
    Ok(config)
}

pub fn save_to_path<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml_string).context("Failed to write config file")?;

    Ok(())
}
