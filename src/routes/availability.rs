use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    models::schedule::{AvailabilityQuery, SlotsQuery},
    AppState,
};

/// GET /availability?date=YYYY-MM-DD&meal=pranzo|cena — public, used by the
/// booking calendar. Goes through the same predicate as booking validation so
/// the calendar and the server can never disagree.
pub async fn get_availability(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityQuery>,
) -> Json<Value> {
    let service = state.schedule.day_service(params.date);
    let available = state.schedule.is_meal_available(params.date, params.meal);

    Json(json!({
        "date": params.date,
        "meal": params.meal,
        "available": available,
        "service": service,
    }))
}

/// GET /availability/slots?meal=pranzo|cena — public, bookable time slots.
pub async fn get_time_slots(
    State(state): State<AppState>,
    Query(params): Query<SlotsQuery>,
) -> Json<Value> {
    Json(json!({
        "meal": params.meal,
        "slots": state.schedule.time_slots(params.meal),
    }))
}
