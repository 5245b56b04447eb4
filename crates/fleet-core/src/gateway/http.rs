//! HTTP client for a compute control API.
//!
//! Endpoints, relative to the configured base URL:
//!
//! ```text
//! GET  /instances/{id}        -> {"state": "running"}
//! POST /instances/{id}/start
//! POST /instances/{id}/stop
//! ```
//!
//! Failed calls return `{"code": "...", "message": "..."}`; the code is
//! carried through to users as the provider error code.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::LifecycleGateway;
use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::types::{InstanceId, InstanceStatus};

/// Code reported when the control API could not be reached at all
const REQUEST_FAILED: &str = "RequestFailed";

#[derive(Debug, Deserialize)]
struct DescribeResponse {
    state: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    #[serde(default)]
    message: String,
}

/// Lifecycle gateway backed by a REST control API
#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway from configuration
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    fn instance_url(&self, instance: &InstanceId, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("{}/instances/{}/{}", self.base_url, instance, action),
            None => format!("{}/instances/{}", self.base_url, instance),
        }
    }

    async fn send(&self, method: reqwest::Method, url: &str) -> Result<reqwest::Response> {
        debug!("Gateway request: {} {}", method, url);

        let mut req = self.client.request(method, url);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::gateway(REQUEST_FAILED, e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        Err(match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => Error::gateway(body.code, body.message),
            Err(_) => Error::gateway(format!("HTTP{}", status.as_u16()), text),
        })
    }

    async fn transition(&self, instance: &InstanceId, action: &str) -> Result<()> {
        let url = self.instance_url(instance, Some(action));
        self.send(reqwest::Method::POST, &url).await?;
        Ok(())
    }
}

#[async_trait]
impl LifecycleGateway for HttpGateway {
    async fn describe(&self, instance: &InstanceId) -> Result<InstanceStatus> {
        let url = self.instance_url(instance, None);
        let resp = self.send(reqwest::Method::GET, &url).await?;
        let body: DescribeResponse = resp
            .json()
            .await
            .map_err(|e| Error::gateway("InvalidResponse", e.to_string()))?;
        Ok(InstanceStatus::parse(&body.state))
    }

    async fn start(&self, instance: &InstanceId) -> Result<()> {
        self.transition(instance, "start").await
    }

    async fn stop(&self, instance: &InstanceId) -> Result<()> {
        self.transition(instance, "stop").await
    }
}
