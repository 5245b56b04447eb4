//! Scheduled shutdown sweep.
//!
//! Stops every running instance that is not retained, then forgets all
//! retentions. Retention therefore covers exactly one sweep and has to be
//! renewed for the next one.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::gateway::LifecycleGateway;
use crate::notify::Notifier;
use crate::registry::AliasRegistry;
use crate::reply::Reply;
use crate::store::RetainedStore;
use crate::types::InstanceStatus;

/// Notification title for a completed sweep
pub const SUMMARY_TITLE: &str = "Scheduled Shutdown";

/// Notification title for a sweep that could not complete
pub const FAILURE_TITLE: &str = "Scheduled Shutdown Error";

/// What happened to one alias during a sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepAction {
    /// Retained for this cycle, left untouched
    Retained,
    /// Was running, stop requested
    Stopped,
    /// Not running, nothing to do
    AlreadyInState(InstanceStatus),
    /// Describe or stop failed
    Failed(String),
}

/// One summary line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepEntry {
    pub alias: String,
    pub action: SweepAction,
}

impl fmt::Display for SweepEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            SweepAction::Retained => write!(f, "{} retained, skipped", self.alias),
            SweepAction::Stopped => write!(f, "{} stopped", self.alias),
            SweepAction::AlreadyInState(status) => {
                write!(f, "{} already {}", self.alias, status)
            }
            SweepAction::Failed(detail) => {
                write!(f, "{} error checking or stopping: {}", self.alias, detail)
            }
        }
    }
}

/// Result of a sweep that ran to completion
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub entries: Vec<SweepEntry>,
    /// Retained aliases no longer present in the registry
    pub stale: Vec<String>,
    pub started_at: DateTime<Utc>,
}

impl SweepReport {
    /// Newline-joined summary sent to chat
    pub fn summary(&self) -> String {
        if self.entries.is_empty() {
            return "No servers configured.".to_string();
        }
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn count(&self, matches: impl Fn(&SweepAction) -> bool) -> usize {
        self.entries.iter().filter(|e| matches(&e.action)).count()
    }
}

/// Outcome reported to whoever triggered the sweep
#[derive(Debug, Clone)]
pub enum SweepOutcome {
    Completed(SweepReport),
    Failed { message: String },
}

impl SweepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SweepOutcome::Completed(_))
    }

    pub fn into_reply(self) -> Reply {
        match self {
            SweepOutcome::Completed(report) => Reply::ok(report.summary()),
            SweepOutcome::Failed { message } => Reply::failure(message),
        }
    }
}

/// Runs the scheduled shutdown
pub struct SweepController {
    registry: Arc<AliasRegistry>,
    gateway: Arc<dyn LifecycleGateway>,
    store: Arc<dyn RetainedStore>,
    notifier: Arc<dyn Notifier>,
}

impl SweepController {
    pub fn new(
        registry: Arc<AliasRegistry>,
        gateway: Arc<dyn LifecycleGateway>,
        store: Arc<dyn RetainedStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            registry,
            gateway,
            store,
            notifier,
        }
    }

    /// Run one sweep and notify the outcome.
    ///
    /// Per-alias failures are part of a completed report; only failures
    /// reading or clearing the retained set fail the sweep.
    pub async fn run(&self) -> SweepOutcome {
        match self.sweep().await {
            Ok(report) => {
                let summary = report.summary();
                let elapsed_ms = (Utc::now() - report.started_at).num_milliseconds();
                info!(
                    started_at = %report.started_at,
                    elapsed_ms,
                    stopped = report.count(|a| *a == SweepAction::Stopped),
                    retained = report.count(|a| *a == SweepAction::Retained),
                    failed = report.count(|a| matches!(a, SweepAction::Failed(_))),
                    "Scheduled shutdown completed"
                );
                self.notifier.notify(SUMMARY_TITLE, &summary).await;
                SweepOutcome::Completed(report)
            }
            Err(e) => {
                let message = format!("Error during scheduled shutdown: {}", e);
                error!("{}", message);
                self.notifier.notify(FAILURE_TITLE, &message).await;
                SweepOutcome::Failed { message }
            }
        }
    }

    async fn sweep(&self) -> Result<SweepReport> {
        let started_at = Utc::now();
        let retained = self.store.read().await?;

        let stale: Vec<String> = retained
            .aliases()
            .filter(|alias| !self.registry.contains(alias))
            .map(String::from)
            .collect();
        for alias in &stale {
            warn!(alias = %alias, "Ignoring retained alias missing from registry");
        }

        let mut entries = Vec::with_capacity(self.registry.len());
        for (alias, instance) in self.registry.iter() {
            let action = if retained.contains(alias) {
                SweepAction::Retained
            } else {
                match self.shut_down(instance).await {
                    Ok(action) => action,
                    Err(e) => {
                        warn!(alias, error = %e, "Shutdown failed");
                        SweepAction::Failed(e.to_string())
                    }
                }
            };
            entries.push(SweepEntry {
                alias: alias.to_string(),
                action,
            });
        }

        self.store.clear().await?;

        Ok(SweepReport {
            entries,
            stale,
            started_at,
        })
    }

    async fn shut_down(&self, instance: &crate::types::InstanceId) -> Result<SweepAction> {
        let status = self.gateway.describe(instance).await?;
        if status != InstanceStatus::Running {
            return Ok(SweepAction::AlreadyInState(status));
        }

        self.gateway.stop(instance).await?;
        Ok(SweepAction::Stopped)
    }
}
