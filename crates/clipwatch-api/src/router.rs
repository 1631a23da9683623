//! Router configuration and server setup.

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config));

    Router::new()
        // Health
        .route("/api/health", get(handlers::health))
        // Configuration
        .route(
            "/api/config",
            get(handlers::get_config).post(handlers::save_config),
        )
        // Capture
        .route("/api/capture/connect", post(handlers::connect_capture))
        // Streams
        .route("/api/streams/:identity/start", post(handlers::start_stream))
        .route("/api/streams/:identity/stop", post(handlers::stop_stream))
        .route(
            "/api/streams/:identity/messages",
            post(handlers::send_chat_message),
        )
        .route("/api/stream_action", post(handlers::stream_action))
        // Status and logs
        .route("/api/status", get(handlers::get_status))
        .route("/api/clear_logs", post(handlers::clear_logs))
        // Replays
        .route("/api/replays", get(handlers::list_replays))
        .layer(middleware)
        .with_state(state)
}

/// Starts the API server.
pub async fn serve(config: ApiConfig, state: AppState) -> Result<(), std::io::Error> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn server() -> (TestServer, AppState) {
        let (state, _hub) = test_state();
        let server = TestServer::new(create_router(state.clone())).unwrap();
        (server, state)
    }

    async fn save_config(server: &TestServer, body: Value) {
        server
            .post("/api/config")
            .json(&body)
            .await
            .assert_status_ok();
    }

    async fn wait_until_active(server: &TestServer, identity: &str) {
        for _ in 0..400 {
            let body: Value = server.get("/api/status").await.json();
            if body["active_streams"][identity] == true {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("{identity} never became active");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (server, _) = server();

        let response = server.get("/api/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert!(!body["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_config_defaults() {
        let (server, _) = server();

        let body: Value = server.get("/api/config").await.json();

        assert_eq!(body["source_name"], "Window Capture");
        assert_eq!(body["keywords"], "mine, code, lock, ssd");
        assert_eq!(body["notifications_enabled"], true);
        assert_eq!(body["notification_duration"], 5);
    }

    #[tokio::test]
    async fn test_save_config_persists_and_applies() {
        let (server, state) = server();

        save_config(
            &server,
            json!({"username": ["streamA", "streamB"], "keywords": "lock", "obs_password": "pw"}),
        )
        .await;

        assert!(state.settings_store.path().exists());
        let (stored, _) = state.settings_store.load();
        assert_eq!(stored.keywords, "lock");
        assert_eq!(state.coordinator.settings().identities().len(), 2);

        let body: Value = server.get("/api/config").await.json();
        assert_eq!(body["username"], json!(["streamA", "streamB"]));
        assert_eq!(body["obs_password"], "pw");
    }

    #[tokio::test]
    async fn test_save_config_rejects_negative_duration() {
        let (server, state) = server();

        let response = server
            .post("/api/config")
            .json(&json!({"notification_duration": -1}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(!state.settings_store.path().exists());
    }

    #[tokio::test]
    async fn test_start_without_keywords_is_bad_request() {
        let (server, _) = server();
        save_config(&server, json!({"username": "streamA", "keywords": " , "})).await;

        let response = server.post("/api/streams/streamA/start").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("keyword"));
    }

    #[tokio::test]
    async fn test_start_and_stop_stream() {
        let (server, _) = server();
        save_config(&server, json!({"username": "streamA"})).await;

        let response = server.post("/api/streams/@streamA/start").await;
        response.assert_status(StatusCode::ACCEPTED);
        let body: Value = response.json();
        assert_eq!(body["identity"], "streamA");
        wait_until_active(&server, "streamA").await;

        server
            .post("/api/streams/streamA/stop")
            .await
            .assert_status(StatusCode::ACCEPTED);
        let body: Value = server.get("/api/status").await.json();
        assert_eq!(body["active_streams"]["streamA"], false);
    }

    #[tokio::test]
    async fn test_stream_action_toggle() {
        let (server, state) = server();
        save_config(&server, json!({"username": "streamA"})).await;

        server
            .post("/api/stream_action")
            .json(&json!({"identity": "streamA", "action": "start"}))
            .await
            .assert_status(StatusCode::ACCEPTED);
        wait_until_active(&server, "streamA").await;

        server
            .post("/api/stream_action")
            .json(&json!({"identity": "streamA", "action": "stop"}))
            .await
            .assert_status(StatusCode::ACCEPTED);
        assert!(!state.coordinator.is_active("streamA").await.unwrap());
    }

    #[tokio::test]
    async fn test_injected_message_triggers_notification() {
        let (server, state) = server();
        save_config(&server, json!({"username": "streamA", "keywords": "lock"})).await;
        server.post("/api/streams/streamA/start").await;
        wait_until_active(&server, "streamA").await;

        server
            .post("/api/streams/streamA/messages")
            .json(&json!({"chatter": "u1", "display_name": "alice", "text": "the LOCK code"}))
            .await
            .assert_status_ok();

        let mut notifications = Vec::new();
        for _ in 0..400 {
            let body: Value = server.get("/api/status").await.json();
            notifications = body["notifications"].as_array().unwrap().clone();
            if !notifications.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0]["chatter"], "alice");
        assert_eq!(notifications[0]["keyword"], "lock");
        assert_eq!(state.coordinator.latest_trigger().unwrap().chatter, "alice");

        let body: Value = server.get("/api/status").await.json();
        assert!(body["notifications"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_message_to_idle_stream_is_conflict() {
        let (server, _) = server();

        let response = server
            .post("/api/streams/nobody/messages")
            .json(&json!({"chatter": "u1", "text": "lock"}))
            .await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_connect_capture_without_password() {
        let (server, _) = server();

        let response = server.post("/api/capture/connect").json(&json!({})).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["accepted"], false);
        assert_eq!(body["message"], "Please enter the capture password");
    }

    #[tokio::test]
    async fn test_connect_capture_with_password() {
        let (server, state) = server();

        let response = server
            .post("/api/capture/connect")
            .json(&json!({"password": "secret"}))
            .await;

        let body: Value = response.json();
        assert_eq!(body["accepted"], true);
        for _ in 0..400 {
            if state.coordinator.capture_state().connected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let body: Value = server.get("/api/status").await.json();
        assert_eq!(body["capture_connected"], true);
    }

    #[tokio::test]
    async fn test_status_stream_filter() {
        let (server, _) = server();
        save_config(&server, json!({"username": ["streamA", "streamB"]})).await;
        server.post("/api/streams/streamA/start").await;
        server.post("/api/streams/streamB/start").await;
        wait_until_active(&server, "streamA").await;
        wait_until_active(&server, "streamB").await;

        let body: Value = server.get("/api/status?stream=streamA").await.json();
        let logs = body["logs"].as_array().unwrap();

        assert!(!logs.is_empty());
        assert!(logs.iter().all(|e| e["stream"] != "streamB"));
        assert!(logs.iter().any(|e| e["stream"] == "streamA"));
    }

    #[tokio::test]
    async fn test_clear_logs() {
        let (server, state) = server();
        state.coordinator.connect_capture(None);
        assert!(!state
            .coordinator
            .snapshot_logs(&clipwatch_events::LogFilter::new())
            .is_empty());

        server.post("/api/clear_logs").await.assert_status_ok();

        assert!(state
            .coordinator
            .snapshot_logs(&clipwatch_events::LogFilter::new())
            .is_empty());
    }

    #[tokio::test]
    async fn test_list_replays() {
        let (server, state) = server();
        std::fs::write(state.video_dir().join("alice_lock.mp4"), b"clip").unwrap();
        std::fs::write(state.video_dir().join("notes.txt"), b"text").unwrap();

        let response = server.get("/api/replays").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["replays"][0]["name"], "alice_lock.mp4");
        assert_eq!(body["replays"][0]["size_bytes"], 4);
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let (server, _) = server();

        let response = server
            .get("/api/health")
            .add_header(
                axum::http::header::ORIGIN,
                HeaderValue::from_static("http://localhost:3000"),
            )
            .await;

        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
