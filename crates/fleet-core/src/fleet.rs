//! Wiring of the registry and adapters shared by the interpreter and sweep.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::FleetConfig;
use crate::error::Result;
use crate::gateway::{HttpGateway, LifecycleGateway};
use crate::interpreter::CommandInterpreter;
use crate::notify::{LogNotifier, Notifier, WebhookNotifier};
use crate::registry::AliasRegistry;
use crate::store::{FileRetainedStore, RetainedStore};
use crate::sweep::SweepController;

/// Registry plus the three external collaborators
#[derive(Clone)]
pub struct Fleet {
    registry: Arc<AliasRegistry>,
    gateway: Arc<dyn LifecycleGateway>,
    store: Arc<dyn RetainedStore>,
    notifier: Arc<dyn Notifier>,
}

impl Fleet {
    pub fn new(
        registry: AliasRegistry,
        gateway: Arc<dyn LifecycleGateway>,
        store: Arc<dyn RetainedStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            gateway,
            store,
            notifier,
        }
    }

    /// Build the production adapters described by `config`.
    pub fn from_config(config: &FleetConfig) -> Result<Self> {
        let registry = config.registry()?;
        let gateway = Arc::new(HttpGateway::new(&config.gateway)?);
        let store = Arc::new(FileRetainedStore::new(config.store.path.clone()));

        let notifier: Arc<dyn Notifier> = match config.notifier.webhook_url.as_deref() {
            Some(url) if !url.is_empty() => {
                Arc::new(WebhookNotifier::new(url, &config.notifier)?)
            }
            _ => {
                debug!("No webhook configured, notifications go to the log");
                Arc::new(LogNotifier)
            }
        };

        info!(
            aliases = registry.len(),
            gateway = %config.gateway.endpoint,
            store = %config.store.path.display(),
            "Fleet initialised"
        );

        Ok(Self::new(registry, gateway, store, notifier))
    }

    pub fn registry(&self) -> &AliasRegistry {
        &self.registry
    }

    pub fn interpreter(&self) -> CommandInterpreter {
        CommandInterpreter::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.gateway),
            Arc::clone(&self.store),
        )
    }

    pub fn sweeper(&self) -> SweepController {
        SweepController::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.gateway),
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
        )
    }
}
