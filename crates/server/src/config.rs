use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which persistence backend to run on, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database file path (sqlite backend only).
    #[serde(default = "default_store_path")]
    pub path: String,
    /// Rooms expire after this much inactivity; refreshed on every write.
    #[serde(default = "default_room_ttl_hours")]
    pub room_ttl_hours: u64,
    /// Reports are kept far longer than the rooms that produced them.
    #[serde(default = "default_report_ttl_days")]
    pub report_ttl_days: u64,
}

fn default_store_path() -> String {
    "./data/planpoker.db".to_string()
}

fn default_room_ttl_hours() -> u64 {
    168 // 7 days
}

fn default_report_ttl_days() -> u64 {
    365
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: default_store_path(),
            room_ttl_hours: default_room_ttl_hours(),
            report_ttl_days: default_report_ttl_days(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Try to load from environment variable
        if let Ok(path) = std::env::var("PLANPOKER_CONFIG") {
            return Self::load_from_path(&PathBuf::from(path));
        }

        // Try to load from default locations
        let default_paths = vec![
            PathBuf::from("planpoker-server.toml"),
            PathBuf::from("config/planpoker-server.toml"),
            PathBuf::from("/etc/planpoker/server.toml"),
        ];

        for path in default_paths {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        // Return default config if no file found
        tracing::warn!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn room_ttl(&self) -> Duration {
        Duration::from_secs(self.store.room_ttl_hours * 3600)
    }

    pub fn report_ttl(&self) -> Duration {
        Duration::from_secs(self.store.report_ttl_days * 24 * 3600)
    }
}
