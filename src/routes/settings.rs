use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::error;

use crate::{
    middleware::auth::OperatorPin,
    models::settings::{keys, UpdateSettingsRequest},
    AppState,
};

/// GET /settings — operator PIN required. Returns the notification address:
/// stored override or the configured restaurant address.
pub async fn get_settings(
    State(state): State<AppState>,
    _pin: OperatorPin,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let stored = state
        .settings
        .get(keys::NOTIFICATION_EMAIL)
        .await
        .map_err(|e| {
            error!("Errore recupero impostazioni: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Errore durante il recupero" })),
            )
        })?;

    let notification_email = stored
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| state.config.restaurant_email.clone());

    Ok(Json(json!({ "notification_email": notification_email })))
}

/// POST /settings — operator PIN required. Fields are applied only when
/// present in the body.
pub async fn update_settings(
    State(state): State<AppState>,
    _pin: OperatorPin,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if let Some(email) = body.notification_email {
        state
            .settings
            .upsert(keys::NOTIFICATION_EMAIL, email.trim())
            .await
            .map_err(|e| {
                error!("Errore salvataggio impostazioni: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Errore durante il salvataggio" })),
                )
            })?;
    }

    Ok(Json(json!({ "success": true })))
}
