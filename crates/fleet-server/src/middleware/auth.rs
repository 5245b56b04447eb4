//! Signing-token middleware for fleet-server.
//!
//! `/commands` receives the chat platform's form post directly, so its body
//! is always plain `application/x-www-form-urlencoded`. Base64-wrapped
//! bodies arrive only through the `/events` envelope, whose
//! `isBase64Encoded` flag selects the decoding.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::state::AppState;

/// Largest command body accepted
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Form fields posted by the chat platform
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub text: String,
}

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    MalformedBody,
    InvalidToken,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error, code) = match self {
            AuthError::MalformedBody => (
                StatusCode::BAD_REQUEST,
                "Malformed request body",
                "MALFORMED_BODY",
            ),
            AuthError::InvalidToken => (
                StatusCode::FORBIDDEN,
                "Invalid signing token",
                "INVALID_TOKEN",
            ),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

/// Decode a form-url-encoded body, optionally base64 wrapped
pub fn decode_body(raw: &[u8], is_base64: bool) -> Result<SlashCommand, AuthError> {
    let decoded;
    let form = if is_base64 {
        decoded = STANDARD
            .decode(raw.trim_ascii())
            .map_err(|_| AuthError::MalformedBody)?;
        decoded.as_slice()
    } else {
        raw
    };

    serde_urlencoded::from_bytes(form).map_err(|_| AuthError::MalformedBody)
}

/// Decode and verify the signing token in one step
pub fn authenticate(
    state: &AppState,
    raw: &[u8],
    is_base64: bool,
) -> Result<SlashCommand, AuthError> {
    let command = decode_body(raw, is_base64)?;

    if state.signing_key.authorize(&command.token).is_err() {
        warn!(user = %command.user_name, "Rejected command with invalid signing token");
        return Err(AuthError::InvalidToken);
    }

    Ok(command)
}

/// Signing-token middleware for axum
///
/// Consumes the form body and hands the verified [`SlashCommand`] to the
/// handler as a request extension.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let (mut parts, body) = request.into_parts();
    let raw: Bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| AuthError::MalformedBody)?;

    let command = authenticate(&state, &raw, false)?;

    parts.extensions.insert(command);
    let request = Request::from_parts(parts, Body::empty());

    Ok(next.run(request).await)
}
