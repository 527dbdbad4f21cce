//! Application configuration management.
//!
//! Configuration holds the API base URL override, which storage backend
//! keeps the session, how to react to an expired token, and the last email
//! used to log in.
//!
//! Configuration is stored at `~/.config/journal/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::{FileStore, KeyValueStore, KeyringStore, MemoryStore};

/// Application name used for config/data/cache directory paths
const APP_NAME: &str = "journal";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the API base URL at runtime.
/// The same name is read at compile time to bake in a default.
pub const BASE_URL_ENV: &str = "JOURNAL_API_BASE_URL";

/// Used when neither the environment, the config file nor the build set a URL
pub const DEFAULT_API_BASE_URL: &str = "https://couappback.onrender.com";

/// Fallback directory when the platform has no standard location
const FALLBACK_DIR: &str = "./.journal";

/// Where the persisted session lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

/// What to do when the server rejects the token on an entry request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthorizedPolicy {
    /// Keep the session; the failure is only logged
    #[default]
    KeepSession,
    /// Treat the token as expired and log out
    Logout,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub storage: StorageBackend,
    pub unauthorized_policy: UnauthorizedPolicy,
    pub request_timeout_secs: Option<u64>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the file-backed session store
    pub fn data_dir(&self) -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR))
    }

    /// Directory for logs
    pub fn cache_dir(&self) -> PathBuf {
        dirs::cache_dir()
            .map(|dir| dir.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR))
    }

    /// API base URL: environment, then config file, then build-time value,
    /// then the built-in default
    pub fn base_url(&self) -> String {
        self.resolve_base_url(std::env::var(BASE_URL_ENV).ok())
    }

    fn resolve_base_url(&self, from_env: Option<String>) -> String {
        let url = from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_base_url.clone().filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| option_env!("JOURNAL_API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL).to_string());
        url.trim().trim_end_matches('/').to_string()
    }

    /// Request timeout, or None to rely on the transport default
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Open the configured session storage backend
    pub fn open_storage(&self) -> Box<dyn KeyValueStore> {
        match self.storage {
            StorageBackend::File => Box::new(FileStore::in_dir(self.data_dir())),
            StorageBackend::Keyring => Box::new(KeyringStore::default()),
            StorageBackend::Memory => Box::new(MemoryStore::new()),
        }
    }
}
