//! Command interpreter.
//!
//! Turns one line of command text from one user into one reply. Parsing and
//! alias validation happen before any store or gateway call; every failure
//! after that is rendered into the reply text instead of being returned.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::command::{Command, Verb};
use crate::error::{Error, Result};
use crate::gateway::LifecycleGateway;
use crate::registry::AliasRegistry;
use crate::reply::Reply;
use crate::store::RetainedStore;
use crate::types::{InstanceId, InstanceStatus};

/// Executes slash commands against the fleet
pub struct CommandInterpreter {
    registry: Arc<AliasRegistry>,
    gateway: Arc<dyn LifecycleGateway>,
    store: Arc<dyn RetainedStore>,
}

impl CommandInterpreter {
    pub fn new(
        registry: Arc<AliasRegistry>,
        gateway: Arc<dyn LifecycleGateway>,
        store: Arc<dyn RetainedStore>,
    ) -> Self {
        Self {
            registry,
            gateway,
            store,
        }
    }

    /// Parse and execute command text, always producing a reply.
    pub async fn interpret(&self, text: &str, user: &str) -> Reply {
        let result = match Command::parse(text) {
            Ok(command) => self.execute(&command, user).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(message) => Reply::ok(message),
            Err(e) => {
                warn!(user, text, error = %e, "Command failed");
                Reply::ok(format!("Error: {}", e))
            }
        }
    }

    /// Execute a parsed command.
    ///
    /// "Already in that state" outcomes are successful messages, not errors.
    pub async fn execute(&self, command: &Command, user: &str) -> Result<String> {
        debug!(user, verb = %command.verb, "Executing command");

        match command.verb {
            Verb::List => Ok(self.list_statuses().await),
            Verb::ListRetain => self.list_retained().await,
            Verb::Retain => self.retain(command.resolve_target(user), user).await,
            Verb::Drop => self.drop_retained(command.resolve_target(user)).await,
            Verb::Status | Verb::Start | Verb::Stop => {
                let alias = command.resolve_target(user);
                let instance = self.resolve(alias, user)?;
                let status = self.gateway.describe(instance).await?;

                match command.verb {
                    Verb::Start => self.start(alias, instance, &status).await,
                    Verb::Stop => self.stop(alias, instance, &status).await,
                    _ => Ok(format!("Dev server {} is currently {}", alias, status)),
                }
            }
        }
    }

    fn resolve(&self, alias: &str, user: &str) -> Result<&InstanceId> {
        self.registry
            .get(alias)
            .ok_or_else(|| Error::unknown_alias(alias, user))
    }

    async fn list_statuses(&self) -> String {
        let mut lines = vec!["Available servers with their current status:".to_string()];

        for (alias, instance) in self.registry.iter() {
            match self.gateway.describe(instance).await {
                Ok(status) => lines.push(format!("*{}* - status: *{}*", alias, status)),
                Err(e) => {
                    warn!(alias, error = %e, "Status lookup failed");
                    lines.push(format!(
                        "*{}* - Error retrieving status - {}",
                        alias,
                        e.code()
                    ));
                }
            }
        }

        lines.join("\n")
    }

    async fn list_retained(&self) -> Result<String> {
        let retained = self.store.read().await?;
        if retained.is_empty() {
            return Ok("No servers are currently retained.".to_string());
        }

        let mut lines = vec!["Currently retained servers:".to_string()];
        lines.extend(retained.aliases().map(|alias| format!("*{}*", alias)));
        Ok(lines.join("\n"))
    }

    async fn retain(&self, alias: &str, user: &str) -> Result<String> {
        let instance = self.resolve(alias, user)?.clone();
        let mut retained = self.store.read().await?;

        if !retained.insert(alias, instance) {
            return Ok(format!("Server *{}* is already retained.", alias));
        }

        self.store.write(&retained).await?;
        info!(alias, user, "Server retained");
        Ok(format!("Successfully retained server *{}*.", alias))
    }

    async fn drop_retained(&self, alias: &str) -> Result<String> {
        let mut retained = self.store.read().await?;

        if retained.remove(alias).is_none() {
            return Err(Error::NotRetained(alias.to_string()));
        }

        self.store.write(&retained).await?;
        info!(alias, "Server dropped from retained list");
        Ok(format!(
            "Successfully dropped server *{}* from the retained list.",
            alias
        ))
    }

    async fn start(
        &self,
        alias: &str,
        instance: &InstanceId,
        status: &InstanceStatus,
    ) -> Result<String> {
        if *status == InstanceStatus::Running {
            return Ok(format!("Dev server {} is already running.", alias));
        }

        self.gateway.start(instance).await?;
        info!(alias, %instance, "Start requested");
        Ok(format!("Successfully started dev server {}", alias))
    }

    async fn stop(
        &self,
        alias: &str,
        instance: &InstanceId,
        status: &InstanceStatus,
    ) -> Result<String> {
        if status.is_halted() {
            return Ok(format!("Dev server {} is already {}.", alias, status));
        }

        self.gateway.stop(instance).await?;
        info!(alias, %instance, "Stop requested");
        Ok(format!("Successfully stopped dev server {}", alias))
    }
}
