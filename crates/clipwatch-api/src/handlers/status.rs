//! Status polling and log handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use clipwatch_models::StreamIdentity;

use crate::error::Result;
use crate::state::AppState;
use crate::types::{StatusQuery, StatusResponse, SuccessResponse};

/// GET /api/status - Logs, stream states, capture state and pending
/// notifications. Notifications are removed by the poll that returns them.
pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>> {
    let stream = query
        .stream
        .map(StreamIdentity::new)
        .filter(|s| !s.is_empty());
    let report = state.coordinator.status(stream).await?;
    Ok(Json(report.into()))
}

/// POST /api/clear_logs - Empty the operator log.
pub async fn clear_logs(State(state): State<AppState>) -> Json<SuccessResponse> {
    state.coordinator.clear_logs();
    Json(SuccessResponse {
        message: "Logs cleared".to_string(),
    })
}
