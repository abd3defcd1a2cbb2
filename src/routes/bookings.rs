use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::error;
use uuid::Uuid;

use crate::{
    middleware::{auth::OperatorPin, rate_limit::check_rate_limit},
    models::booking::CreateBookingRequest,
    services::{
        bookings::BookingService,
        metrics::{BOOKINGS_COUNTER, BOOKING_REJECTIONS_COUNTER, EMAILS_COUNTER},
        settings,
    },
    AppState,
};

/// POST /bookings — public intake form.
///
/// Payload errors are 400, availability/admission rejections are 409 with the
/// customer-facing reason, infrastructure failures are 500. Emails go out on a
/// detached task so a mail outage never fails an accepted booking.
pub async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    // Rate limit by IP: max 10 submissions per hour
    // Extract real client IP from X-Real-IP header (set by nginx)
    let ip = headers
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let mut redis = state.redis.clone();
    check_rate_limit(&mut redis, &format!("bookings:form:{ip}"), 10, 3600).await?;

    if !payload.privacy_consent {
        return Err(bad_request(
            "È necessario accettare l'informativa sulla privacy.",
        ));
    }
    if payload.guests < 1 {
        return Err(bad_request("Numero di ospiti non valido."));
    }
    if !state
        .schedule
        .time_slots(payload.meal)
        .iter()
        .any(|slot| slot == &payload.time)
    {
        return Err(bad_request("Orario non prenotabile per il servizio scelto."));
    }

    if let Err(rejection) =
        BookingService::validate(&state.schedule, &state.admission, payload.date, payload.meal)
            .await
    {
        BOOKINGS_COUNTER.with_label_values(&["rejected"]).inc();
        BOOKING_REJECTIONS_COUNTER
            .with_label_values(&[rejection.code()])
            .inc();
        return Err((
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "error": rejection.to_string(),
                "reason": rejection.code(),
            })),
        ));
    }

    let booking = BookingService::create(&state.db, &payload).await.map_err(|e| {
        error!("Errore creazione prenotazione: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "error": "Errore durante la prenotazione" })),
        )
    })?;

    BOOKINGS_COUNTER.with_label_values(&["accepted"]).inc();

    if let Some(email) = state.email.clone() {
        let config = state.config.clone();
        let store = state.settings.clone();
        let day_name = state.schedule.day_name(booking.date);
        let booking = booking.clone();
        tokio::spawn(async move {
            let recipient = settings::notification_email(store.as_ref(), &config).await;

            match email
                .send_booking_confirmation(&config, &booking, day_name)
                .await
            {
                Ok(()) => EMAILS_COUNTER.with_label_values(&["customer", "sent"]).inc(),
                Err(e) => {
                    error!("Invio email cliente fallito: {e}");
                    EMAILS_COUNTER.with_label_values(&["customer", "error"]).inc();
                }
            }

            match email
                .send_booking_notification(&config, &booking, day_name, &recipient)
                .await
            {
                Ok(()) => EMAILS_COUNTER
                    .with_label_values(&["restaurant", "sent"])
                    .inc(),
                Err(e) => {
                    error!("Invio email ristorante fallito: {e}");
                    EMAILS_COUNTER
                        .with_label_values(&["restaurant", "error"])
                        .inc();
                }
            }
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "booking": booking })),
    ))
}

/// GET /bookings — operator PIN required, newest first.
pub async fn list_bookings(
    State(state): State<AppState>,
    _pin: OperatorPin,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    BookingService::list(&state.db)
        .await
        .map(|bookings| Json(json!({ "bookings": bookings })))
        .map_err(|e| {
            error!("Errore recupero prenotazioni: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Errore durante il recupero" })),
            )
        })
}

/// DELETE /bookings/{id} — operator PIN required.
pub async fn delete_booking(
    State(state): State<AppState>,
    _pin: OperatorPin,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match BookingService::delete(&state.db, id).await {
        Ok(true) => Ok(Json(json!({ "success": true }))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Prenotazione non trovata" })),
        )),
        Err(e) => {
            error!("Errore eliminazione prenotazione: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Errore durante l'eliminazione" })),
            ))
        }
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": message })),
    )
}
