//! Configuration for the market data service

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDataConfig {
    /// Bus namespace shared by all fxgrid processes
    pub bus_dir: String,

    /// Channel all fxgrid streams live on
    pub channel: String,

    /// Quote generation rate across the whole symbol set
    pub ticks_per_second: u32,

    /// Heartbeat emission interval
    pub heartbeat_interval_ms: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            bus_dir: "fxgrid".to_string(),
            channel: "ipc:fxgrid".to_string(),
            ticks_per_second: 10,
            heartbeat_interval_ms: 1_000,
        }
    }
}

impl MarketDataConfig {
    /// Load from a TOML file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
