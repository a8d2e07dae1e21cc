//! Client configuration persistence
//!
//! Stores connection settings in the platform-specific config folder:
//! - Linux: ~/.config/s3-store/config.json
//! - Windows: %APPDATA%/s3-store/config.json
//! - macOS: ~/Library/Application Support/s3-store/config.json
//!
//! Environment variables (`S3_STORE_*`) override file values, so nothing
//! needs to be hardcoded to point the store at a different service.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Connection settings for the store
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Named AWS profile to resolve credentials from
    #[serde(default)]
    pub profile: Option<String>,

    /// Region override; falls back to the SDK's resolution chain
    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint URL for S3-compatible services (MinIO, R2, ...)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Static access key, used together with `secret_access_key`
    #[serde(default)]
    pub access_key_id: Option<String>,

    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// Path-style addressing, required by most self-hosted services
    #[serde(default)]
    pub force_path_style: bool,
}

impl StoreConfig {
    /// Load config from disk, returning defaults if the file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: StoreConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;

        tracing::info!(
            profile = ?config.profile,
            region = ?config.region,
            endpoint = ?config.endpoint_url,
            "Loaded store config"
        );

        Ok(config)
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        tracing::debug!("Saved config to {:?}", path);

        Ok(())
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "s3-store", "s3-store")
            .context("Failed to determine config directory")?;

        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Apply `S3_STORE_*` environment overrides on top of the file values
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(profile) = env::var("S3_STORE_PROFILE") {
            self.profile = Some(profile);
        }
        if let Ok(region) = env::var("S3_STORE_REGION") {
            self.region = Some(region);
        }
        if let Ok(endpoint) = env::var("S3_STORE_ENDPOINT_URL") {
            self.endpoint_url = Some(endpoint);
        }
        if let Ok(key) = env::var("S3_STORE_ACCESS_KEY_ID") {
            self.access_key_id = Some(key);
        }
        if let Ok(secret) = env::var("S3_STORE_SECRET_ACCESS_KEY") {
            self.secret_access_key = Some(secret);
        }
        if let Ok(value) = env::var("S3_STORE_FORCE_PATH_STYLE") {
            self.force_path_style = matches!(value.as_str(), "1" | "true" | "yes");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, PoisonError};
    use tempfile::TempDir;

    // Tests below mutate process env vars; serialize them
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // Helper to isolate the config dir for a test
    fn with_temp_home<F>(test: F)
    where
        F: FnOnce(),
    {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let temp_dir = TempDir::new().unwrap();
        let old_home = env::var("HOME").ok();
        let old_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("HOME", temp_dir.path());
        env::set_var("XDG_CONFIG_HOME", temp_dir.path().join(".config"));

        test();

        match old_home {
            Some(home) => env::set_var("HOME", home),
            None => env::remove_var("HOME"),
        }
        match old_xdg {
            Some(xdg) => env::set_var("XDG_CONFIG_HOME", xdg),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert!(config.profile.is_none());
        assert!(config.region.is_none());
        assert!(config.endpoint_url.is_none());
        assert!(config.access_key_id.is_none());
        assert!(config.secret_access_key.is_none());
        assert!(!config.force_path_style);
    }

    #[test]
    fn test_load_returns_defaults_when_file_missing() {
        with_temp_home(|| {
            let config = StoreConfig::load().unwrap();
            assert!(config.endpoint_url.is_none());
            assert!(!config.force_path_style);
        });
    }

    #[test]
    fn test_save_and_load_round_trip() {
        with_temp_home(|| {
            let config = StoreConfig {
                profile: Some("staging".to_string()),
                region: Some("eu-central-1".to_string()),
                endpoint_url: Some("http://localhost:9000".to_string()),
                access_key_id: None,
                secret_access_key: None,
                force_path_style: true,
            };
            config.save().unwrap();

            let loaded = StoreConfig::load().unwrap();
            assert_eq!(loaded.profile, Some("staging".to_string()));
            assert_eq!(loaded.region, Some("eu-central-1".to_string()));
            assert_eq!(loaded.endpoint_url, Some("http://localhost:9000".to_string()));
            assert!(loaded.force_path_style);
        });
    }

    #[test]
    fn test_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        env::set_var("S3_STORE_REGION", "ap-southeast-2");
        env::set_var("S3_STORE_FORCE_PATH_STYLE", "true");

        let config = StoreConfig::default().with_env_overrides();
        assert_eq!(config.region, Some("ap-southeast-2".to_string()));
        assert!(config.force_path_style);

        env::remove_var("S3_STORE_REGION");
        env::remove_var("S3_STORE_FORCE_PATH_STYLE");
    }

    #[test]
    fn test_partial_config_file_fills_defaults() {
        with_temp_home(|| {
            let path = StoreConfig::config_path().unwrap();
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, r#"{"region": "us-west-2"}"#).unwrap();

            let loaded = StoreConfig::load().unwrap();
            assert_eq!(loaded.region, Some("us-west-2".to_string()));
            assert!(loaded.endpoint_url.is_none());
            assert!(!loaded.force_path_style);
        });
    }
}
