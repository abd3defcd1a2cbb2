use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// DB row struct — meal is fetched as TEXT and parsed at the edge.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub date: NaiveDate,
    /// "pranzo" | "cena"
    pub meal: String,
    /// Wall-clock slot, HH:MM.
    pub time: String,
    pub guests: i32,
    pub notes: Option<String>,
    pub privacy_consent: bool,
    pub marketing_consent: bool,
    pub created_at: DateTime<Utc>,
}

/// Body for POST /bookings (public intake form).
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub date: NaiveDate,
    pub meal: crate::models::schedule::MealType,
    pub time: String,
    pub guests: i32,
    pub notes: Option<String>,
    #[serde(default)]
    pub privacy_consent: bool,
    #[serde(default)]
    pub marketing_consent: bool,
}
