//! Application configuration management.
//!
//! Configuration holds the remote endpoint and credentials, the local
//! database location and the sync timeouts. It is stored at
//! `~/.config/versecache/config.json`; `VERSECACHE_*` environment variables
//! override the file.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "versecache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Database file name inside the data directory
const DATABASE_FILE: &str = "localdata.db";

/// Remote table holding the poem catalog
const DEFAULT_TABLE: &str = "Poems";

const ENV_REMOTE_URL: &str = "VERSECACHE_REMOTE_URL";
const ENV_API_KEY: &str = "VERSECACHE_API_KEY";
const ENV_TABLE: &str = "VERSECACHE_TABLE";
const ENV_DB_PATH: &str = "VERSECACHE_DB_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub remote_url: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
    pub database_path: Option<PathBuf>,
    pub fetch_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

impl Config {
    /// Load the config file (defaults if absent), then apply environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_REMOTE_URL) {
            self.remote_url = Some(url);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(table) = get(ENV_TABLE) {
            self.table = Some(table);
        }
        if let Some(path) = get(ENV_DB_PATH) {
            self.database_path = Some(PathBuf::from(path));
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn table(&self) -> &str {
        self.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.database_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(DATABASE_FILE))
    }

    /// Report what is missing before a sync can reach the remote.
    pub fn validate_remote(&self) -> Result<()> {
        let missing: Vec<&str> = [
            (self.remote_url.is_none(), ENV_REMOTE_URL),
            (self.api_key.is_none(), ENV_API_KEY),
        ]
        .into_iter()
        .filter_map(|(missing, name)| missing.then_some(name))
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "Remote source not configured, set {}",
                missing.join(" and ")
            ))
        }
    }
}
