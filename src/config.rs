//! Store configuration
//!
//! Connection and cache settings, loaded once at startup from a JSON file
//! and saved back with the same shape.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure reading or writing the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Connection and cache settings for the sync store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Remote store base URL, e.g. `https://project.supabase.co`
    #[serde(default)]
    pub url: String,
    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,
    /// Collection holding tote records
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Bucket holding item photos
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Snapshot file the fallback cache reads and writes
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// Seconds between change-watch polls; 0 disables watching
    #[serde(default = "default_watch_interval")]
    pub watch_interval_secs: u64,
}

fn default_collection() -> String {
    "totes".to_string()
}

fn default_bucket() -> String {
    "tote-images".to_string()
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("totes-inventory.json")
}

fn default_watch_interval() -> u64 {
    15
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            url: String::new(),
            api_key: String::new(),
            collection: default_collection(),
            bucket: default_bucket(),
            cache_path: default_cache_path(),
            watch_interval_secs: default_watch_interval(),
        }
    }
}

impl StoreConfig {
    /// Read a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<StoreConfig, ConfigError> {
        if !path.exists() {
            return Ok(StoreConfig::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write the config back where `load` will find it
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = StoreConfig::load(&dir.path().join("store_config.json")).expect("load");
        assert_eq!(config.collection, "totes");
        assert_eq!(config.bucket, "tote-images");
        assert_eq!(config.watch_interval_secs, 15);
        assert!(config.url.is_empty());
    }

    #[test]
    fn test_round_trips_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store_config.json");

        let config = StoreConfig {
            url: "https://project.supabase.co".to_string(),
            api_key: "anon-key".to_string(),
            watch_interval_secs: 0,
            ..StoreConfig::default()
        };
        config.save(&path).expect("save");

        let back = StoreConfig::load(&path).expect("load");
        assert_eq!(back.url, config.url);
        assert_eq!(back.api_key, config.api_key);
        assert_eq!(back.watch_interval_secs, 0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store_config.json");
        std::fs::write(&path, r#"{"url": "https://p.supabase.co", "api_key": "k"}"#)
            .expect("write");

        let config = StoreConfig::load(&path).expect("load");
        assert_eq!(config.url, "https://p.supabase.co");
        assert_eq!(config.collection, "totes");
        assert_eq!(config.cache_path, PathBuf::from("totes-inventory.json"));
    }
}
