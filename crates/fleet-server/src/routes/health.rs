//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub aliases: usize,
    /// Daily sweep time in UTC, when scheduled in-process
    pub daily_sweep: Option<String>,
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        aliases: state.alias_count,
        daily_sweep: state
            .config
            .daily_at
            .map(|t| t.format("%H:%M").to_string()),
    })
}
