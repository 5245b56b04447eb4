//! Configuration management for fleet.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (FLEET_*)
//! 2. Config file (`$FLEET_CONFIG`, else `$FLEET_DIR/config.toml`, else `~/.fleet/config.toml`)
//! 3. Default values
//!
//! ```toml
//! [auth]
//! signing_key = "..."
//!
//! [gateway]
//! endpoint = "https://compute.internal/v1"
//!
//! [sweep]
//! daily_at = "19:00"
//!
//! [[aliases]]
//! name = "alice"
//! instance = "i-0abc123"
//! ```

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::registry::{AliasEntry, AliasRegistry};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Inbound request verification
    #[serde(default)]
    pub auth: AuthConfig,

    /// Compute control API
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Retained list persistence
    #[serde(default)]
    pub store: StoreConfig,

    /// Chat notifications
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Scheduled shutdown
    #[serde(default)]
    pub sweep: SweepConfig,

    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Alias registry, in display order
    #[serde(default)]
    pub aliases: Vec<AliasEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret every slash command must carry as `token`
    pub signing_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the compute control API
    #[serde(default = "default_gateway_endpoint")]
    pub endpoint: String,

    /// Bearer token for the control API
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the retained list JSON document
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Incoming webhook URL; notifications are only logged when unset
    pub webhook_url: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Daily sweep time, "HH:MM" in UTC. No in-process schedule when unset.
    pub daily_at: Option<String>,

    /// `source` value identifying scheduler invocations on the events endpoint
    #[serde(default = "default_scheduled_source")]
    pub scheduled_source: String,

    /// Secret scheduled events must present; `auth.signing_key` when unset
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to
    #[serde(default = "default_bind")]
    pub bind: String,
}

// Default value functions
fn default_gateway_endpoint() -> String {
    "http://127.0.0.1:8600".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_store_path() -> PathBuf {
    fleet_dir().join("retained_servers.json")
}

fn default_scheduled_source() -> String {
    "aws.events".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_gateway_endpoint(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            daily_at: None,
            scheduled_source: default_scheduled_source(),
            token: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl SweepConfig {
    /// Parsed `daily_at`, if configured
    pub fn daily_time(&self) -> Result<Option<NaiveTime>> {
        self.daily_at
            .as_deref()
            .map(|s| {
                NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|e| {
                    Error::Config(format!("sweep.daily_at must be HH:MM, got {:?}: {}", s, e))
                })
            })
            .transpose()
    }
}

/// Base directory for fleet data (`$FLEET_DIR`, else `~/.fleet`)
pub fn fleet_dir() -> PathBuf {
    std::env::var("FLEET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".fleet")
        })
}

impl FleetConfig {
    /// Load configuration from the default location and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file and the environment.
    ///
    /// A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content without touching the environment.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("FLEET_CONFIG") {
            PathBuf::from(path)
        } else {
            fleet_dir().join("config.toml")
        }
    }

    /// Overlay FLEET_* variables on top of file values.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("FLEET_SIGNING_KEY") {
            self.auth.signing_key = Some(key);
        }
        if let Some(key) = lookup("FLEET_GATEWAY_API_KEY") {
            self.gateway.api_key = Some(key);
        }
        if let Some(url) = lookup("FLEET_WEBHOOK_URL") {
            self.notifier.webhook_url = Some(url);
        }
        if let Some(path) = lookup("FLEET_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }
        if let Some(token) = lookup("FLEET_SCHEDULER_TOKEN") {
            self.sweep.token = Some(token);
        }
        if let Some(bind) = lookup("FLEET_BIND") {
            self.server.bind = bind;
        }
    }

    /// Check aliases and schedule.
    pub fn validate(&self) -> Result<()> {
        self.registry()?;
        self.sweep.daily_time()?;
        if self.gateway.endpoint.trim().is_empty() {
            return Err(Error::Config("gateway.endpoint must not be empty".into()));
        }
        Ok(())
    }

    /// Build the alias registry from `[[aliases]]`.
    pub fn registry(&self) -> Result<AliasRegistry> {
        AliasRegistry::new(self.aliases.clone())
    }

    /// Signing key, required by the HTTP boundary.
    pub fn require_signing_key(&self) -> Result<&str> {
        match self.auth.signing_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::Config(
                "auth.signing_key (or FLEET_SIGNING_KEY) must be set".into(),
            )),
        }
    }

    /// Secret that authorizes scheduled sweep events.
    pub fn scheduler_token(&self) -> Result<&str> {
        match self.sweep.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => self.require_signing_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[auth]
signing_key = "s3cret"

[gateway]
endpoint = "https://compute.internal/v1"
timeout_secs = 5

[store]
path = "/var/lib/fleet/retained.json"

[sweep]
daily_at = "19:30"

[[aliases]]
name = "alice"
instance = "i-0a"

[[aliases]]
name = "bob"
instance = "i-0b"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = FleetConfig::parse(SAMPLE).unwrap();

        assert_eq!(config.auth.signing_key.as_deref(), Some("s3cret"));
        assert_eq!(config.gateway.endpoint, "https://compute.internal/v1");
        assert_eq!(config.gateway.timeout_secs, 5);
        assert_eq!(config.store.path, PathBuf::from("/var/lib/fleet/retained.json"));
        assert_eq!(
            config.sweep.daily_time().unwrap(),
            NaiveTime::from_hms_opt(19, 30, 0)
        );
        assert_eq!(config.sweep.scheduled_source, "aws.events");
        assert_eq!(config.server.bind, "127.0.0.1:8080");

        let registry = config.registry().unwrap();
        let names: Vec<&str> = registry.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn test_defaults() {
        let config = FleetConfig::default();

        assert!(config.auth.signing_key.is_none());
        assert!(config.notifier.webhook_url.is_none());
        assert!(config.sweep.daily_at.is_none());
        assert!(config.aliases.is_empty());
        assert!(config.store.path.ends_with("retained_servers.json"));
        assert!(config.require_signing_key().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = FleetConfig::parse(SAMPLE).unwrap();
        let env: HashMap<&str, &str> = [
            ("FLEET_SIGNING_KEY", "from-env"),
            ("FLEET_WEBHOOK_URL", "https://hooks.example.com/T/B/X"),
            ("FLEET_BIND", "0.0.0.0:9000"),
        ]
        .into_iter()
        .collect();

        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.require_signing_key().unwrap(), "from-env");
        assert_eq!(
            config.notifier.webhook_url.as_deref(),
            Some("https://hooks.example.com/T/B/X")
        );
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        // Untouched values survive
        assert_eq!(config.gateway.endpoint, "https://compute.internal/v1");
    }

    #[test]
    fn test_scheduler_token_falls_back_to_signing_key() {
        let mut config = FleetConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.scheduler_token().unwrap(), "s3cret");

        config.apply_env(|key| (key == "FLEET_SCHEDULER_TOKEN").then(|| "cron-only".to_string()));
        assert_eq!(config.scheduler_token().unwrap(), "cron-only");

        assert!(FleetConfig::default().scheduler_token().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_schedule() {
        let mut config = FleetConfig::default();
        config.sweep.daily_at = Some("7pm".to_string());
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_alias() {
        let mut config = FleetConfig::default();
        config.aliases = vec![AliasEntry::new("a", "i-1"), AliasEntry::new("a", "i-2")];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let config = FleetConfig::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.sweep.scheduled_source, "aws.events");
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = FleetConfig::load_from(&path).unwrap();
        assert_eq!(config.aliases.len(), 2);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = FleetConfig::parse("[gateway\nendpoint = ");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
