//! In-memory lifecycle gateway.
//!
//! Records every call and lets callers script failures, so interpreter and
//! sweep behaviour can be checked without a compute provider.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::LifecycleGateway;
use crate::error::{Error, Result};
use crate::types::{InstanceId, InstanceStatus};

/// A call observed by [`MemoryGateway`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Describe(InstanceId),
    Start(InstanceId),
    Stop(InstanceId),
}

impl GatewayCall {
    pub fn operation(&self) -> Operation {
        match self {
            GatewayCall::Describe(_) => Operation::Describe,
            GatewayCall::Start(_) => Operation::Start,
            GatewayCall::Stop(_) => Operation::Stop,
        }
    }
}

/// Gateway operation kinds, for scripting failures on one of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Describe,
    Start,
    Stop,
}

/// Scripted failure; `None` matches every operation
type FailureKey = (InstanceId, Option<Operation>);

#[derive(Default)]
struct Inner {
    instances: HashMap<InstanceId, InstanceStatus>,
    failures: HashMap<FailureKey, (String, String)>,
    calls: Vec<GatewayCall>,
}

/// Gateway over a map of instance states
#[derive(Default)]
pub struct MemoryGateway {
    inner: Mutex<Inner>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style instance registration
    pub fn with_instance(self, instance: impl Into<InstanceId>, status: InstanceStatus) -> Self {
        self.set_status(instance, status);
        self
    }

    pub fn set_status(&self, instance: impl Into<InstanceId>, status: InstanceStatus) {
        self.lock().instances.insert(instance.into(), status);
    }

    /// Make every call for this instance fail with the given provider code
    pub fn fail_with(&self, instance: impl Into<InstanceId>, code: &str, message: &str) {
        self.script_failure((instance.into(), None), code, message);
    }

    /// Make only `operation` fail for this instance
    pub fn fail_on(
        &self,
        instance: impl Into<InstanceId>,
        operation: Operation,
        code: &str,
        message: &str,
    ) {
        self.script_failure((instance.into(), Some(operation)), code, message);
    }

    fn script_failure(&self, key: FailureKey, code: &str, message: &str) {
        self.lock()
            .failures
            .insert(key, (code.to_string(), message.to_string()));
    }

    pub fn status(&self, instance: &InstanceId) -> Option<InstanceStatus> {
        self.lock().instances.get(instance).cloned()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panicking test thread must not hide state from the others
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply(
        &self,
        call: GatewayCall,
        instance: &InstanceId,
        next: Option<InstanceStatus>,
    ) -> Result<InstanceStatus> {
        let mut inner = self.lock();
        let operation = call.operation();
        inner.calls.push(call);

        let failure = inner
            .failures
            .get(&(instance.clone(), None))
            .or_else(|| inner.failures.get(&(instance.clone(), Some(operation))));
        if let Some((code, message)) = failure {
            return Err(Error::gateway(code.clone(), message.clone()));
        }

        let current = inner.instances.get(instance).cloned().ok_or_else(|| {
            Error::gateway(
                "InvalidInstanceID.NotFound",
                format!("The instance ID '{}' does not exist", instance),
            )
        })?;

        if let Some(next) = next {
            inner.instances.insert(instance.clone(), next);
        }
        Ok(current)
    }
}

#[async_trait]
impl LifecycleGateway for MemoryGateway {
    async fn describe(&self, instance: &InstanceId) -> Result<InstanceStatus> {
        self.apply(GatewayCall::Describe(instance.clone()), instance, None)
    }

    async fn start(&self, instance: &InstanceId) -> Result<()> {
        self.apply(
            GatewayCall::Start(instance.clone()),
            instance,
            Some(InstanceStatus::Pending),
        )?;
        Ok(())
    }

    async fn stop(&self, instance: &InstanceId) -> Result<()> {
        self.apply(
            GatewayCall::Stop(instance.clone()),
            instance,
            Some(InstanceStatus::Stopping),
        )?;
        Ok(())
    }
}
