//! Bucket profiles
//!
//! A profile names one bucket on one S3-compatible endpoint together with
//! the credentials used to reach it. Profiles live in the configuration file.

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// A named connection to a single bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// S3 endpoint URL; empty means the AWS default for `region`
    #[serde(default)]
    pub endpoint: String,

    /// Bucket browsed through this profile
    pub bucket: String,

    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,

    /// Access key ID; empty means the SDK's default credential chain
    #[serde(default)]
    pub access_key: String,

    /// Secret access key
    #[serde(default)]
    pub secret_key: String,

    /// Use path-style bucket addressing
    #[serde(default)]
    pub path_style: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Profile {
    /// Create a new profile with required fields
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            region: default_region(),
            access_key: String::new(),
            secret_key: String::new(),
            path_style: false,
        }
    }

    /// Set static credentials
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = access_key.into();
        self.secret_key = secret_key.into();
        self
    }

    /// Whether static credentials are configured
    pub fn has_static_credentials(&self) -> bool {
        !self.access_key.is_empty()
    }

    /// Check the fields a connection cannot be made without
    pub fn validate(&self) -> Result<()> {
        if !is_valid_profile_name(&self.name) {
            return Err(Error::Config(format!(
                "Invalid profile name '{}'. Use letters, digits, '_' or '-'",
                self.name
            )));
        }
        if self.bucket.is_empty() {
            return Err(Error::Config("Bucket name cannot be empty".into()));
        }
        if !self.endpoint.is_empty() {
            url::Url::parse(&self.endpoint)?;
        }
        if self.access_key.is_empty() != self.secret_key.is_empty() {
            return Err(Error::Config(
                "Access key and secret key must be given together".into(),
            ));
        }
        Ok(())
    }
}

fn is_valid_profile_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Manager for profile operations
pub struct ProfileManager {
    config_manager: ConfigManager,
}

impl ProfileManager {
    /// Create a new ProfileManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new ProfileManager using the default config location
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_manager: ConfigManager::new()?,
        })
    }

    /// List all configured profiles
    pub fn list(&self) -> Result<Vec<Profile>> {
        Ok(self.config_manager.load()?.profiles)
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        self.config_manager
            .load()?
            .profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Resolve the profile to use: the named one, else the configured default
    pub fn resolve(&self, name: Option<&str>) -> Result<Profile> {
        match name {
            Some(name) => self.get(name),
            None => {
                let config = self.config_manager.load()?;
                let default = config.default_profile.ok_or(Error::NoDefaultProfile)?;
                config
                    .profiles
                    .into_iter()
                    .find(|p| p.name == default)
                    .ok_or(Error::ProfileNotFound(default))
            }
        }
    }

    /// Add a profile
    ///
    /// An existing profile with the same name is replaced only when
    /// `overwrite` is set. The first profile added becomes the default.
    pub fn add(&self, profile: Profile, overwrite: bool) -> Result<()> {
        profile.validate()?;
        self.config_manager.update(|mut config| {
            let exists = config.profiles.iter().any(|p| p.name == profile.name);
            if exists && !overwrite {
                return Err(Error::ProfileExists(profile.name.clone()));
            }
            config.profiles.retain(|p| p.name != profile.name);
            if config.default_profile.is_none() {
                config.default_profile = Some(profile.name.clone());
            }
            config.profiles.push(profile);
            Ok(config)
        })?;
        Ok(())
    }

    /// Remove a profile, clearing the default if it pointed at it
    pub fn remove(&self, name: &str) -> Result<()> {
        self.config_manager.update(|mut config| {
            let original_len = config.profiles.len();
            config.profiles.retain(|p| p.name != name);
            if config.profiles.len() == original_len {
                return Err(Error::ProfileNotFound(name.to_string()));
            }
            if config.default_profile.as_deref() == Some(name) {
                config.default_profile = None;
            }
            Ok(config)
        })?;
        Ok(())
    }

    /// Make `name` the default profile
    pub fn set_default(&self, name: &str) -> Result<()> {
        self.config_manager.update(|mut config| {
            if !config.profiles.iter().any(|p| p.name == name) {
                return Err(Error::ProfileNotFound(name.to_string()));
            }
            config.default_profile = Some(name.to_string());
            Ok(config)
        })?;
        Ok(())
    }

    /// Name of the default profile, if any
    pub fn default_name(&self) -> Result<Option<String>> {
        Ok(self.config_manager.load()?.default_profile)
    }

    /// Check if a profile exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.profiles.iter().any(|p| p.name == name))
    }
}
