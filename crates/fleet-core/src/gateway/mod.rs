//! Instance lifecycle gateway.
//!
//! The gateway is the only path to the compute provider:
//! - `describe`: current lifecycle state of one instance
//! - `start` / `stop`: request a transition without waiting for it

mod http;
mod memory;

pub use http::HttpGateway;
pub use memory::{GatewayCall, MemoryGateway, Operation};

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{InstanceId, InstanceStatus};

/// Describe/start/stop a single instance.
#[async_trait]
pub trait LifecycleGateway: Send + Sync {
    /// Get the current lifecycle state of an instance.
    async fn describe(&self, instance: &InstanceId) -> Result<InstanceStatus>;

    /// Request that an instance start.
    async fn start(&self, instance: &InstanceId) -> Result<()>;

    /// Request that an instance stop.
    async fn stop(&self, instance: &InstanceId) -> Result<()>;
}
