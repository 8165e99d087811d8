use crate::engine::EngineTiming;
use crate::storage::Storage;
use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// How often the terminal loop redraws and pumps the engine.
    pub frame_interval_ms: u64,
    pub settle_delay_ms: u64,
    pub ready_delay_ms: u64,
    pub resume_offset_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_interval_ms: 50,
            settle_delay_ms: 500,
            ready_delay_ms: 1000,
            resume_offset_ms: 500,
        }
    }
}

impl Config {
    pub fn timing(&self) -> EngineTiming {
        EngineTiming {
            settle: Duration::milliseconds(self.settle_delay_ms as i64),
            ready: Duration::milliseconds(self.ready_delay_ms as i64),
            resume_offset: Duration::milliseconds(self.resume_offset_ms as i64),
        }
    }
}

pub fn load_config() -> Result<Config> {
    let path = Storage::get_base_dir()?.join("config.json");
    load_config_from(&path)
}

/// Reads the config at `path`, writing the defaults there first if missing.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        let data = serde_json::to_string_pretty(&config)?;
        fs::write(path, data)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;
        return Ok(config);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config = serde_json::from_str(&data)
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}
