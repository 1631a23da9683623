//! Replay listing handler.

use axum::{extract::State, Json};

use crate::error::Result;
use crate::state::AppState;
use crate::types::ReplayListResponse;

/// GET /api/replays - Clips in the video directory, newest first.
pub async fn list_replays(State(state): State<AppState>) -> Result<Json<ReplayListResponse>> {
    let replays = clipwatch_persistence::list_replays(state.video_dir())?;
    let total = replays.len();
    Ok(Json(ReplayListResponse { replays, total }))
}
