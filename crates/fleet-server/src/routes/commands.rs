//! Slash command endpoint.

use axum::{extract::State, response::Response, Extension};
use std::sync::Arc;
use tracing::info;

use super::reply_response;
use crate::middleware::SlashCommand;
use crate::state::AppState;

/// POST /commands - Run one verified slash command
pub async fn handle_command(
    State(state): State<Arc<AppState>>,
    Extension(command): Extension<SlashCommand>,
) -> Response {
    reply_response(run_command(&state, &command).await)
}

/// Interpret a verified command, shared with the events endpoint
pub async fn run_command(state: &AppState, command: &SlashCommand) -> fleet_core::Reply {
    info!(
        user = %command.user_name,
        command = %command.command,
        text = %command.text,
        "Slash command received"
    );
    state
        .interpreter
        .interpret(&command.text, &command.user_name)
        .await
}
