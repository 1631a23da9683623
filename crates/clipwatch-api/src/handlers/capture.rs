//! Capture application handlers.

use axum::{extract::State, Json};

use crate::state::AppState;
use crate::types::{ConnectCaptureRequest, ConnectCaptureResponse};

/// POST /api/capture/connect - Start connecting to the capture application.
///
/// Returns as soon as the attempt is started; poll `/api/status` for the
/// outcome.
pub async fn connect_capture(
    State(state): State<AppState>,
    Json(req): Json<ConnectCaptureRequest>,
) -> Json<ConnectCaptureResponse> {
    let ack = state.coordinator.connect_capture(req.password.as_deref());
    Json(ack.into())
}
