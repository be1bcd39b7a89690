//! # Remote Endpoint Configuration
//!
//! Configuration for reaching the remote entity service.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SHOPSYNC_REMOTE_URL=https://api.example.com/v1                     │
//! │     SHOPSYNC_API_KEY=...                                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $SHOPSYNC_CONFIG, or the platform config dir:                      │
//! │     ~/.config/shopsync/remote.toml (Linux)                             │
//! │     ~/Library/Application Support/com.shopsync.app/remote.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8000/api, no api key                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # remote.toml
//! [service]
//! base_url = "https://api.example.com/v1"
//! api_key = "srv_xxxxxxxx"
//! request_timeout_secs = 30
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading/saving failures.
///
/// Kept separate from [`crate::RemoteError`]: a missing config file is a
/// setup problem, not a failed remote call.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    /// Config file location could not be determined.
    #[error("No config directory available on this platform")]
    NoConfigDir,

    /// Resolved values are unusable (bad base URL, unbuildable client).
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

// =============================================================================
// Remote Config
// =============================================================================

/// Connection settings for the remote entity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL every collection path is joined onto.
    pub base_url: String,

    /// Bearer token sent with every request, when set.
    pub api_key: Option<String>,

    /// Client-level request timeout. This is the only timeout the core
    /// applies; there is no per-operation retry or deadline policy.
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            base_url: "http://localhost:8000/api".to_string(),
            api_key: None,
            request_timeout_secs: 30,
        }
    }
}

/// On-disk wrapper so the file reads `[service]`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    service: RemoteConfig,
}

impl RemoteConfig {
    /// Loads configuration: file (if present) then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            debug!(path = %path.display(), "Loading remote config file");
            let raw = std::fs::read_to_string(&path)?;
            let file: ConfigFile = toml::from_str(&raw)?;
            file.service
        } else {
            debug!(path = %path.display(), "No remote config file, using defaults");
            RemoteConfig::default()
        };

        config.apply_env_overrides();
        info!(base_url = %config.base_url, "Remote config resolved");
        Ok(config)
    }

    /// Writes the configuration to the platform config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let file = ConfigFile {
            service: self.clone(),
        };
        let raw = toml::to_string_pretty(&file)?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(path = %path.display(), "Remote config saved");
        Ok(())
    }

    /// Resolves the config file path: `$SHOPSYNC_CONFIG` or the platform
    /// config directory.
    fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var("SHOPSYNC_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        directories::ProjectDirs::from("com", "shopsync", "shopsync")
            .map(|dirs| dirs.config_dir().join("remote.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Environment variables win over the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SHOPSYNC_REMOTE_URL") {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        if let Ok(key) = std::env::var("SHOPSYNC_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
