//! Configuration management
//!
//! This module handles loading, saving, and migrating the bx configuration file.
//! The configuration file is stored in TOML format at ~/.config/bx/config.toml,
//! or under `$BX_CONFIG_DIR` when that is set.
//!
//! Preferences are loaded once per invocation and handed to the renderer as an
//! immutable value; only `bx config set` writes them back.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::Profile;

/// Current configuration schema version
///
/// Bumping this version requires a migration in [`ConfigManager::load`].
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "BX_CONFIG_DIR";

/// Storage classes accepted for uploads
pub const STORAGE_CLASSES: &[&str] = &[
    "STANDARD",
    "REDUCED_REDUNDANCY",
    "STANDARD_IA",
    "ONEZONE_IA",
    "INTELLIGENT_TIERING",
    "GLACIER",
    "GLACIER_IR",
    "DEEP_ARCHIVE",
];

/// Default storage class for uploads
const DEFAULT_STORAGE_CLASS: &str = "STANDARD";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Profile used when `--profile` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    /// Display and upload preferences
    #[serde(default)]
    pub preferences: Preferences,

    /// Configured bucket profiles
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            default_profile: None,
            preferences: Preferences::default(),
            profiles: Vec::new(),
        }
    }
}

/// When to color terminal output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// How modification times are rendered in listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    #[default]
    Relative,
    Iso,
}

impl FromStr for ColorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(Error::Config(format!(
                "Invalid color mode '{s}'. Use auto, always, or never"
            ))),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        })
    }
}

impl FromStr for DateStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "relative" => Ok(Self::Relative),
            "iso" => Ok(Self::Iso),
            _ => Err(Error::Config(format!(
                "Invalid date style '{s}'. Use relative or iso"
            ))),
        }
    }
}

impl fmt::Display for DateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Relative => "relative",
            Self::Iso => "iso",
        })
    }
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Terminal color mode
    #[serde(default)]
    pub color: ColorMode,

    /// Storage class applied to uploads
    #[serde(default = "default_storage_class")]
    pub storage_class: String,

    /// Date rendering in listings
    #[serde(default)]
    pub dates: DateStyle,
}

fn default_storage_class() -> String {
    DEFAULT_STORAGE_CLASS.to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            color: ColorMode::default(),
            storage_class: default_storage_class(),
            dates: DateStyle::default(),
        }
    }
}

impl Preferences {
    /// Keys accepted by [`Preferences::with`]
    pub const KEYS: &'static [&'static str] = &["color", "storage_class", "dates"];

    /// Return a copy with `key` set to `value`
    pub fn with(&self, key: &str, value: &str) -> Result<Self> {
        let mut updated = self.clone();
        match key {
            "color" => updated.color = value.parse()?,
            "dates" => updated.dates = value.parse()?,
            "storage_class" => updated.storage_class = validate_storage_class(value)?,
            _ => {
                return Err(Error::Config(format!(
                    "Unknown preference '{key}'. Known keys: {}",
                    Self::KEYS.join(", ")
                )));
            }
        }
        Ok(updated)
    }
}

/// Normalize and validate a storage class name
pub fn validate_storage_class(value: &str) -> Result<String> {
    let upper = value.trim().to_ascii_uppercase();
    if STORAGE_CLASSES.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(Error::Config(format!(
            "Unknown storage class '{value}'. Known classes: {}",
            STORAGE_CLASSES.join(", ")
        )))
    }
}

/// Configuration manager handles loading and saving config
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("bx"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    /// Files written by a newer version are rejected.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade bx.",
                config.schema_version, SCHEMA_VERSION
            )));
        }
        config.schema_version = SCHEMA_VERSION;

        Ok(config)
    }

    /// Save configuration to disk
    ///
    /// Creates parent directories if they don't exist.
    /// The file holds credentials, so it is written with mode 600 on Unix.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.config_path, permissions)?;
        }

        Ok(())
    }

    /// Load, apply `update`, and save
    pub fn update<F>(&self, update: F) -> Result<Config>
    where
        F: FnOnce(Config) -> Result<Config>,
    {
        let config = update(self.load()?)?;
        self.save(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let manager = ConfigManager::with_path(config_path);
        (manager, temp_dir)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.preferences.color, ColorMode::Auto);
        assert_eq!(config.preferences.storage_class, "STANDARD");
        assert_eq!(config.preferences.dates, DateStyle::Relative);
        assert!(config.default_profile.is_none());
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let (manager, _temp_dir) = temp_config_manager();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let (manager, _temp_dir) = temp_config_manager();

        let mut config = Config::default();
        config.default_profile = Some("prod".into());
        config.preferences.dates = DateStyle::Iso;
        config
            .profiles
            .push(Profile::new("prod", "http://localhost:9000", "media"));

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let (manager, _temp_dir) = temp_config_manager();
        std::fs::write(
            manager.config_path(),
            "schema_version = 1\n[preferences]\ncolor = \"never\"\n",
        )
        .unwrap();

        let config = manager.load().unwrap();
        assert_eq!(config.preferences.color, ColorMode::Never);
        assert_eq!(config.preferences.storage_class, "STANDARD");
    }

    #[test]
    fn test_schema_version_too_new() {
        let (manager, _temp_dir) = temp_config_manager();

        let content = format!("schema_version = {}\n", SCHEMA_VERSION + 1);
        std::fs::write(manager.config_path(), content).unwrap();

        let result = manager.load();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("newer than supported")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (manager, _temp_dir) = temp_config_manager();
        manager.save(&Config::default()).unwrap();
        let mode = std::fs::metadata(manager.config_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_preferences_with() {
        let prefs = Preferences::default();
        let updated = prefs.with("storage_class", "glacier").unwrap();
        assert_eq!(updated.storage_class, "GLACIER");
        // The original value is untouched
        assert_eq!(prefs.storage_class, "STANDARD");

        let updated = updated.with("dates", "iso").unwrap();
        assert_eq!(updated.dates, DateStyle::Iso);

        let updated = updated.with("color", "ALWAYS").unwrap();
        assert_eq!(updated.color, ColorMode::Always);
    }

    #[test]
    fn test_preferences_with_rejects_bad_values() {
        let prefs = Preferences::default();
        assert!(prefs.with("storage_class", "COLD").is_err());
        assert!(prefs.with("dates", "yesterday").is_err());
        assert!(prefs.with("theme", "dark").is_err());
    }

    #[test]
    fn test_update_persists() {
        let (manager, _temp_dir) = temp_config_manager();
        manager
            .update(|mut config| {
                config.preferences = config.preferences.with("color", "never")?;
                Ok(config)
            })
            .unwrap();

        assert_eq!(manager.load().unwrap().preferences.color, ColorMode::Never);
    }
}
