//! Operator configuration handlers.

use axum::{extract::State, Json};
use clipwatch_core::{CoreError, Settings};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::SuccessResponse;

/// GET /api/config - Current operator settings.
pub async fn get_config(State(state): State<AppState>) -> Json<Settings> {
    Json(state.coordinator.settings())
}

/// POST /api/config - Persist settings and apply them to the coordinator.
///
/// Missing keys take their defaults. Running sessions pick up the new
/// keywords immediately.
pub async fn save_config(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Result<Json<SuccessResponse>> {
    if settings.notification_duration < 0 {
        return Err(ApiError::BadRequest(
            CoreError::InvalidNotificationDuration(settings.notification_duration).to_string(),
        ));
    }

    state.settings_store.save(&settings)?;
    info!(path = %state.settings_store.path().display(), "Configuration saved");
    state.coordinator.apply_settings(settings);

    Ok(Json(SuccessResponse {
        message: "Config saved".to_string(),
    }))
}
