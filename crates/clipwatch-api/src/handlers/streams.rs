//! Stream monitoring handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use clipwatch_models::{ChatEvent, StreamIdentity};

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::{
    ChatMessageRequest, ChatMessageResponse, StreamAction, StreamActionRequest,
    StreamActionResponse,
};

fn start(state: &AppState, identity: &str) -> Result<(StatusCode, Json<StreamActionResponse>)> {
    state.coordinator.start(identity)?;
    let identity = StreamIdentity::new(identity);
    Ok((
        StatusCode::ACCEPTED,
        Json(StreamActionResponse {
            message: format!("Starting monitor for @{identity}"),
            identity: identity.to_string(),
            action: "start".to_string(),
        }),
    ))
}

fn stop(state: &AppState, identity: &str) -> Result<(StatusCode, Json<StreamActionResponse>)> {
    state.coordinator.stop(identity)?;
    let identity = StreamIdentity::new(identity);
    Ok((
        StatusCode::ACCEPTED,
        Json(StreamActionResponse {
            message: format!("Stopping monitor for @{identity}"),
            identity: identity.to_string(),
            action: "stop".to_string(),
        }),
    ))
}

/// POST /api/streams/:identity/start - Schedule monitoring of a stream.
pub async fn start_stream(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<(StatusCode, Json<StreamActionResponse>)> {
    start(&state, &identity)
}

/// POST /api/streams/:identity/stop - Schedule removal of a stream.
pub async fn stop_stream(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<(StatusCode, Json<StreamActionResponse>)> {
    stop(&state, &identity)
}

/// POST /api/stream_action - Start or stop a stream named in the body.
pub async fn stream_action(
    State(state): State<AppState>,
    Json(req): Json<StreamActionRequest>,
) -> Result<(StatusCode, Json<StreamActionResponse>)> {
    match req.action {
        StreamAction::Start => start(&state, &req.identity),
        StreamAction::Stop => stop(&state, &req.identity),
    }
}

/// POST /api/streams/:identity/messages - Inject a chat message into the
/// loopback feed of a running stream.
pub async fn send_chat_message(
    State(state): State<AppState>,
    Path(identity): Path<String>,
    Json(req): Json<ChatMessageRequest>,
) -> Result<Json<ChatMessageResponse>> {
    let hub = state
        .loopback
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("loopback feed not enabled".to_string()))?;

    let identity = StreamIdentity::new(&identity);
    let mut event = ChatEvent::new(identity.clone(), req.chatter, req.text);
    if let Some(name) = req.display_name {
        event = event.with_display_name(name);
    }

    if !hub.inject(event) {
        return Err(ApiError::Conflict(format!(
            "stream not connected: {identity}"
        )));
    }
    Ok(Json(ChatMessageResponse { delivered: true }))
}
