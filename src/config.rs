use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/";

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_per_page() -> u64 {
    15
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_empty_retry_initial_ms() -> u64 {
    500
}

fn default_empty_retry_max_ms() -> u64 {
    15_000
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Base URL of the movie server.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Rows requested per table page.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Seconds between liveness probes while the server is reachable.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Seconds between automatic refreshes of the visible table.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Initial delay before re-fetching a table that returned no rows.
    #[serde(default = "default_empty_retry_initial_ms")]
    pub empty_retry_initial_ms: u64,
    /// Ceiling for the empty-table re-fetch delay.
    #[serde(default = "default_empty_retry_max_ms")]
    pub empty_retry_max_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            per_page: default_per_page(),
            poll_interval_secs: default_poll_interval_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
            empty_retry_initial_ms: default_empty_retry_initial_ms(),
            empty_retry_max_ms: default_empty_retry_max_ms(),
        }
    }
}

impl AppConfig {
    /// Get the path to the config file in the user's home directory
    pub fn config_path() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;

        let config_dir = home_dir.join(".marquee");

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(config_dir.join("config.json"))
    }

    /// Load configuration from the default location, creating the file with
    /// defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: AppConfig = serde_json::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            default_config.save_to(config_path)?;
            Ok(default_config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.server_url = "http://movies.example:9000/".to_string();
        config.per_page = 50;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"server_url": "http://films.local:8080/"}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.server_url, "http://films.local:8080/");
        assert_eq!(config.per_page, default_per_page());
        assert_eq!(config.poll_interval_secs, default_poll_interval_secs());
    }
}
