//! Runtime configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Command-line flags in the `palmcheck` binary override the
//! file.

use crate::{estimate::EstimationParams, types::DEFAULT_DEVICE_ID};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server listens on.
    pub bind_address: String,
    /// SQLite file for observations. `None` keeps them in memory only.
    pub database: Option<String>,
    /// Device id stamped on readings that arrive without one.
    pub default_device_id: String,
    /// Base URL clients use to reach the server.
    pub server_url: String,
    pub dashboard_poll_ms: u64,
    pub yield_poll_ms: u64,
    /// Starting parameters for the yield view.
    pub params: EstimationParams,
    pub simulator: SimulatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".into(),
            database: None,
            default_device_id: DEFAULT_DEVICE_ID.into(),
            server_url: "http://127.0.0.1:5000".into(),
            dashboard_poll_ms: 1_000,
            yield_poll_ms: 5_000,
            params: EstimationParams::default(),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load a JSON config file. Missing keys fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Config with hardcoded values for use in tests.
    pub fn default_test() -> Self {
        Self {
            bind_address: "127.0.0.1:0".into(),
            database: None,
            default_device_id: "test-device".into(),
            server_url: "http://127.0.0.1:0".into(),
            dashboard_poll_ms: 20,
            yield_poll_ms: 50,
            params: EstimationParams::default(),
            simulator: SimulatorConfig::default(),
        }
    }

    pub fn dashboard_interval(&self) -> Duration {
        Duration::from_millis(self.dashboard_poll_ms.max(1))
    }

    pub fn yield_interval(&self) -> Duration {
        Duration::from_millis(self.yield_poll_ms.max(1))
    }
}

/// Load an estimation parameter set from JSON (camelCase keys).
pub fn load_params(path: &str) -> anyhow::Result<EstimationParams> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    let params: EstimationParams = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
    Ok(params)
}

/// Shape of the synthetic readings produced by the device simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    /// Maximum offset from the centre, in degrees, on each axis.
    pub jitter_deg: f64,
    pub ripe_weight:     f64,
    pub unripe_weight:   f64,
    pub overripe_weight: f64,
    /// Sent as `device_id`. `None` lets the server apply its default.
    pub device_id: Option<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            center_lat: -7.27,
            center_lng: 112.79,
            jitter_deg: 0.002,
            ripe_weight: 0.5,
            unripe_weight: 0.35,
            overripe_weight: 0.15,
            device_id: None,
        }
    }
}
