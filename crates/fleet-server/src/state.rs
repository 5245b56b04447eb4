//! Application state.

use fleet_core::auth::SigningKey;
use fleet_core::{CommandInterpreter, Fleet, SweepController};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Verifies the `token` field of inbound commands
    pub signing_key: SigningKey,
    /// Verifies the secret carried by scheduled sweep events
    pub scheduler_key: SigningKey,
    /// Slash command execution
    pub interpreter: CommandInterpreter,
    /// Scheduled shutdown
    pub sweeper: SweepController,
    /// Number of configured aliases
    pub alias_count: usize,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, fleet: &Fleet) -> anyhow::Result<Arc<Self>> {
        let signing_key = SigningKey::new(config.fleet.require_signing_key()?)?;
        let scheduler_key = SigningKey::new(config.fleet.scheduler_token()?)?;

        Ok(Arc::new(Self {
            signing_key,
            scheduler_key,
            interpreter: fleet.interpreter(),
            sweeper: fleet.sweeper(),
            alias_count: fleet.registry().len(),
            config: Arc::new(config),
            start_time: Instant::now(),
        }))
    }

    /// Event source that marks scheduler invocations
    pub fn scheduled_source(&self) -> &str {
        &self.config.fleet.sweep.scheduled_source
    }
}
