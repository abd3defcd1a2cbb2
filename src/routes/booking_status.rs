use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::error;

use crate::{
    middleware::auth::OperatorPin,
    models::admission::{AdmissionStatus, ToggleBookingsRequest},
    services::metrics::ADMISSION_TOGGLES_COUNTER,
    AppState,
};

/// GET /bookings/status — public, drives showing/hiding the booking form.
pub async fn get_status(State(state): State<AppState>) -> Json<AdmissionStatus> {
    Json(state.admission.check_status().await)
}

/// POST /bookings/status — operator toggle, PIN required. A failed store
/// write surfaces as 500 so the operator sees the toggle did not take effect.
pub async fn toggle_bookings(
    State(state): State<AppState>,
    _pin: OperatorPin,
    Json(body): Json<ToggleBookingsRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let committed = state
        .admission
        .toggle(body.enabled, body.message.as_deref())
        .await
        .map_err(|e| {
            error!("Errore salvataggio interruttore prenotazioni: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Errore interno" })),
            )
        })?;

    ADMISSION_TOGGLES_COUNTER
        .with_label_values(&[if committed.enabled { "true" } else { "false" }])
        .inc();

    Ok(Json(json!({
        "success": true,
        "enabled": committed.enabled,
        "message": committed.message,
    })))
}
