//! API route modules.

pub mod commands;
pub mod events;
pub mod health;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use fleet_core::Reply;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info_span;
use uuid::Uuid;

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (events verify command and scheduler tokens themselves)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/events", post(events::handle_event));

    // Protected routes (require a valid signing token)
    let protected_routes = Router::new()
        .route("/commands", post(commands::handle_command))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            info_span!(
                "invocation",
                id = %Uuid::new_v4(),
                method = %request.method(),
                path = %request.uri().path(),
            )
        }))
        .with_state(state)
}

/// Render a reply as the chat JSON envelope
pub fn reply_response(reply: Reply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply.payload())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use fleet_core::gateway::MemoryGateway;
    use fleet_core::notify::MemoryNotifier;
    use fleet_core::registry::{AliasEntry, AliasRegistry};
    use fleet_core::store::MemoryRetainedStore;
    use fleet_core::types::InstanceStatus;
    use fleet_core::{Fleet, FleetConfig};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    const KEY: &str = "s3cret";
    const SCHEDULER_KEY: &str = "cron-s3cret";

    struct TestApp {
        router: Router,
        gateway: Arc<MemoryGateway>,
        store: Arc<MemoryRetainedStore>,
        notifier: Arc<MemoryNotifier>,
        _dir: tempfile::TempDir,
    }

    fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let mut fleet_config = FleetConfig::default();
        fleet_config.auth.signing_key = Some(KEY.to_string());
        fleet_config.sweep.token = Some(SCHEDULER_KEY.to_string());
        fleet_config.store.path = dir.path().join("retained.json");
        let config = Config::from_fleet(dir.path().join("config.toml"), fleet_config).unwrap();

        let registry = AliasRegistry::new(vec![
            AliasEntry::new("alice", "i-0a"),
            AliasEntry::new("bob", "i-0b"),
        ])
        .unwrap();
        let gateway = Arc::new(
            MemoryGateway::new()
                .with_instance("i-0a", InstanceStatus::Running)
                .with_instance("i-0b", InstanceStatus::Stopped),
        );
        let store = Arc::new(MemoryRetainedStore::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let fleet = Fleet::new(registry, gateway.clone(), store.clone(), notifier.clone());

        let state = AppState::new(config, &fleet).unwrap();
        TestApp {
            router: create_router(state),
            gateway,
            store,
            notifier,
            _dir: dir,
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn command_request(form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/commands")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    fn event_request(event: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/events")
            .header("content-type", "application/json")
            .body(Body::from(event.to_string()))
            .unwrap()
    }

    fn scheduled_request(token: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/events")
            .header("content-type", "application/json")
            .header(events::SCHEDULER_TOKEN_HEADER, token)
            .body(Body::from(json!({"source": "aws.events"}).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["aliases"], 2);
        assert!(body["daily_sweep"].is_null());
    }

    #[tokio::test]
    async fn test_command_runs_interpreter() {
        let app = test_app();
        let form = format!("token={KEY}&command=%2Fdev&user_name=bob&text=start");

        let (status, body) = send(&app.router, command_request(&form)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response_type"], "in_channel");
        assert_eq!(body["text"], "Successfully started dev server bob");
        assert_eq!(body["blocks"][0]["type"], "section");
        assert_eq!(body["blocks"][0]["text"]["type"], "mrkdwn");
    }

    #[tokio::test]
    async fn test_command_bad_token_forbidden() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            command_request("token=wrong&user_name=bob&text=start"),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "INVALID_TOKEN");
        assert_eq!(app.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_command_body_is_never_base64_decoded() {
        let app = test_app();
        let encoded = STANDARD.encode(format!("token={KEY}&user_name=bob&text=start"));

        let (status, _) = send(&app.router, command_request(&encoded)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(app.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_command_usage_is_ok() {
        let app = test_app();
        let form = format!("token={KEY}&user_name=bob&text=reboot+everything");

        let (status, body) = send(&app.router, command_request(&form)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].as_str().unwrap().contains("Invalid command"));
        assert_eq!(app.gateway.call_count(), 0);
        assert_eq!(app.store.op_count(), 0);
    }

    #[tokio::test]
    async fn test_scheduled_event_runs_sweep() {
        let app = test_app();

        let (status, body) = send(&app.router, scheduled_request(SCHEDULER_KEY)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "alice stopped\nbob already stopped");
        assert_eq!(app.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_scheduled_event_token_in_envelope() {
        let app = test_app();
        let event = json!({"source": "aws.events", "token": SCHEDULER_KEY});

        let (status, _) = send(&app.router, event_request(event)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.store.clear_count(), 1);
    }

    #[tokio::test]
    async fn test_scheduled_event_without_token_is_forbidden() {
        let app = test_app();
        let form = format!("token={KEY}&user_name=alice&text=retain");
        send(&app.router, command_request(&form)).await;
        let ops_before = app.store.op_count();

        let (status, body) =
            send(&app.router, event_request(json!({"source": "aws.events"}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "INVALID_TOKEN");
        assert_eq!(app.gateway.call_count(), 0);
        assert_eq!(app.store.op_count(), ops_before);
        assert!(app.store.document().unwrap().contains("alice"));
        assert!(app.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_scheduled_event_rejects_signing_key() {
        let app = test_app();

        let (status, _) = send(&app.router, scheduled_request(KEY)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(app.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_sweep_is_server_error() {
        let app = test_app();
        app.store.set_fail_reads(true);

        let (status, body) = send(&app.router, scheduled_request(SCHEDULER_KEY)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            body["text"]
                .as_str()
                .unwrap()
                .starts_with("Error during scheduled shutdown")
        );
    }

    #[tokio::test]
    async fn test_event_with_base64_command() {
        let app = test_app();
        let form = format!("token={KEY}&user_name=alice&text=retain");
        let event = json!({
            "body": STANDARD.encode(form),
            "isBase64Encoded": true,
        });

        let (status, body) = send(&app.router, event_request(event)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Successfully retained server *alice*.");
        assert!(app.store.document().unwrap().contains("alice"));
    }

    #[tokio::test]
    async fn test_event_bad_token_forbidden() {
        let app = test_app();
        let event = json!({"body": "token=nope&user_name=alice&text=stop"});

        let (status, _) = send(&app.router, event_request(event)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(app.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_event_without_body_is_bad_request() {
        let app = test_app();

        let (status, body) =
            send(&app.router, event_request(json!({"source": "manual"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MALFORMED_BODY");
    }
}
