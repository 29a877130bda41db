use super::files::{atomic_write, collection_file, read_file};
use crate::sync::ReconnectPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User settings stored in config.json. Filter state is deliberately absent:
/// filters always start at all/all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Collection document shared by every client; defaults to <data dir>/todos.json
    pub collection_file: Option<PathBuf>,
    /// How often file subscribers check the collection for changes
    pub poll_interval_ms: u64,
    /// UI loop tick (key poll timeout)
    pub tick_ms: u64,
    pub use_emoji: bool,
    /// Default tracing filter, overridden by RUST_LOG
    pub log_level: String,
    pub reconnect: ReconnectPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collection_file: None,
            poll_interval_ms: 500,
            tick_ms: 250,
            use_emoji: true,
            log_level: "info".to_string(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Collection path, resolved against the data directory
    pub fn collection_path(&self, data_dir: &Path) -> PathBuf {
        match &self.collection_file {
            Some(path) if path.is_relative() => data_dir.join(path),
            Some(path) => path.clone(),
            None => collection_file(data_dir),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// Load config from config.json, falling back to defaults when absent
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    let content = read_file(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Save config to config.json
pub fn save_config<P: AsRef<Path>>(path: P, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    atomic_write(path, &json)
}
