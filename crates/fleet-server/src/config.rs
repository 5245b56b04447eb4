//! Server configuration.

use anyhow::Context;
use chrono::NaiveTime;
use fleet_core::FleetConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to configuration file
    pub config_path: PathBuf,
    /// Address the HTTP listener binds to
    pub bind: SocketAddr,
    /// Daily sweep time (UTC), when the in-process schedule is enabled
    pub daily_at: Option<NaiveTime>,
    /// Shared fleet configuration
    pub fleet: FleetConfig,
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Standard directory structure:
    /// ```text
    /// ~/.fleet/
    /// ├── config.toml            # Main configuration
    /// └── retained_servers.json  # Retained list (store.path)
    /// ```
    pub fn load() -> anyhow::Result<Self> {
        let config_path = FleetConfig::config_path();
        let fleet = FleetConfig::load_from(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?;
        Self::from_fleet(config_path, fleet)
    }

    /// Derive server settings from an already loaded fleet configuration
    pub fn from_fleet(config_path: PathBuf, fleet: FleetConfig) -> anyhow::Result<Self> {
        fleet.require_signing_key()?;

        let bind: SocketAddr = fleet
            .server
            .bind
            .parse()
            .with_context(|| format!("server.bind is not a socket address: {}", fleet.server.bind))?;
        let daily_at = fleet.sweep.daily_time()?;

        // The retained document is created lazily, but its directory must exist
        if let Some(parent) = fleet.store.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }

        Ok(Self {
            config_path,
            bind,
            daily_at,
            fleet,
        })
    }
}
