//! Application configuration
//!
//! JSON file with one section per component. Every field has a default, so an
//! empty object (or a missing file) yields a working configuration.

use crate::{Error, KdfParams, Result, WagerLimits};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the SQLite store inside the data directory
pub const STORE_FILE_NAME: &str = "dmnk.sqlite";

/// File name of the configuration inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmnkConfig {
    /// Keystore settings
    pub keystore: KeystoreSettings,
    /// Balance polling settings
    pub balance: BalanceSettings,
    /// Wager slider bounds
    pub wager: WagerLimits,
    /// Durable store settings
    pub storage: StorageSettings,
}

/// Keystore settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeystoreSettings {
    /// KDF costs used for newly created records
    pub kdf: KdfParams,
}

/// Balance polling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSettings {
    /// Refresh interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
        }
    }
}

impl BalanceSettings {
    /// Refresh interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Durable store settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Explicit store path; defaults to the platform data directory
    pub path: Option<PathBuf>,
}

impl StorageSettings {
    /// Path of the SQLite store to open
    pub fn resolve_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => project_dirs()
                .map(|dirs| dirs.data_dir().join(STORE_FILE_NAME))
                .ok_or_else(|| Error::Config("no home directory to place the store in".to_string())),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "dmnk", "dmnk")
}

impl DmnkConfig {
    /// Default config file location for this platform
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration");
        Ok(config)
    }

    /// Load a configuration file, falling back to defaults if it does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            tracing::debug!(
                path = %path.as_ref().display(),
                "No configuration file, using defaults"
            );
            Ok(Self::default())
        }
    }

    /// Write the configuration as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.keystore.kdf.validate()?;
        if self.balance.poll_interval_ms == 0 {
            return Err(Error::Config("poll interval must be non-zero".to_string()));
        }
        self.wager.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DmnkConfig::default();
        assert_eq!(config.balance.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.keystore.kdf, KdfParams::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: DmnkConfig =
            serde_json::from_str(r#"{"balance":{"poll_interval_ms":250}}"#).unwrap();
        assert_eq!(config.balance.poll_interval_ms, 250);
        assert_eq!(config.wager, WagerLimits::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = DmnkConfig::default();
        config.keystore.kdf = KdfParams::interactive();
        config.storage.path = Some(dir.path().join("store.sqlite"));
        config.save(&path).unwrap();

        let loaded = DmnkConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.storage.resolve_path().unwrap(),
            dir.path().join("store.sqlite")
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DmnkConfig::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, DmnkConfig::default());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{"balance":{"poll_interval_ms":0}}"#).unwrap();
        assert!(matches!(DmnkConfig::load(&path), Err(Error::Config(_))));
    }
}
