//! Invocation events endpoint.
//!
//! Accepts the JSON envelope a function-style trigger delivers: scheduler
//! events are recognised by their `source` and run the sweep; anything else
//! carries a slash command form body, plain or base64 encoded.
//!
//! The envelope is caller-supplied, so a scheduled event must also present
//! the scheduler secret, in the `X-Fleet-Scheduler-Token` header or the
//! envelope's `token` field.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::{commands::run_command, reply_response};
use crate::middleware::{auth::authenticate, AuthError};
use crate::state::AppState;

/// Header carrying the scheduler secret
pub const SCHEDULER_TOKEN_HEADER: &str = "x-fleet-scheduler-token";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl InvocationEvent {
    fn is_scheduled(&self, marker: &str) -> bool {
        self.source.as_deref() == Some(marker)
    }
}

/// Check the scheduler secret from the header, else the envelope
fn authorize_scheduled(
    state: &AppState,
    headers: &HeaderMap,
    event: &InvocationEvent,
) -> Result<(), AuthError> {
    let candidate = headers
        .get(SCHEDULER_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .or(event.token.as_deref())
        .unwrap_or_default();

    if state.scheduler_key.verify(candidate) {
        Ok(())
    } else {
        warn!(source = ?event.source, "Rejected scheduled event with invalid token");
        Err(AuthError::InvalidToken)
    }
}

/// POST /events - Dispatch a scheduled sweep or a wrapped slash command
pub async fn handle_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(event): Json<InvocationEvent>,
) -> Response {
    if event.is_scheduled(state.scheduled_source()) {
        if let Err(e) = authorize_scheduled(&state, &headers, &event) {
            return e.into_response();
        }
        info!(source = ?event.source, "Scheduled event received, running sweep");
        return reply_response(state.sweeper.run().await.into_reply());
    }

    let Some(body) = event.body.as_deref() else {
        return AuthError::MalformedBody.into_response();
    };

    match authenticate(&state, body.as_bytes(), event.is_base64_encoded) {
        Ok(command) => reply_response(run_command(&state, &command).await),
        Err(e) => e.into_response(),
    }
}
