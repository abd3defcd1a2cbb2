use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::admission::ClosedReason;
use crate::models::booking::{Booking, CreateBookingRequest};
use crate::models::schedule::{DayService, MealType};
use crate::services::admission::{AdmissionGate, DEFAULT_CLOSED_MESSAGE, EVENT_CLOSED_MESSAGE};
use crate::services::schedule::ScheduleEngine;

/// Expected rejection outcomes of a booking attempt. Not an infrastructure
/// error: each variant carries the customer-facing Italian message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingRejection {
    #[error("Il {day} il ristorante è chiuso")]
    Closed { day: String },
    #[error("Il {day} non è disponibile il servizio {meal}")]
    WrongMeal { day: String, meal: MealType },
    #[error("{message}")]
    AdminDisabled { message: String },
    #[error("{}", EVENT_CLOSED_MESSAGE)]
    EventClosed,
}

impl BookingRejection {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            BookingRejection::Closed { .. } => "closed",
            BookingRejection::WrongMeal { .. } => "wrong_meal",
            BookingRejection::AdminDisabled { .. } => "admin_disabled",
            BookingRejection::EventClosed => "event_closed",
        }
    }
}

pub struct BookingService;

impl BookingService {
    /// The single gate a booking must pass before being persisted: the weekly
    /// schedule first, then the admission switch. Both are required; neither
    /// alone is sufficient.
    pub async fn validate(
        schedule: &ScheduleEngine,
        gate: &AdmissionGate,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<(), BookingRejection> {
        if !schedule.is_meal_available(date, meal) {
            let day = schedule.day_name(date).to_string();
            return Err(match schedule.day_service(date) {
                DayService::Closed => BookingRejection::Closed { day },
                _ => BookingRejection::WrongMeal { day, meal },
            });
        }

        let status = gate.check_status().await;
        if !status.enabled {
            return Err(match status.reason {
                Some(ClosedReason::EventClosed) => BookingRejection::EventClosed,
                _ => BookingRejection::AdminDisabled {
                    message: status
                        .message
                        .unwrap_or_else(|| DEFAULT_CLOSED_MESSAGE.to_string()),
                },
            });
        }

        Ok(())
    }

    pub async fn create(pool: &PgPool, req: &CreateBookingRequest) -> anyhow::Result<Booking> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"INSERT INTO bookings
                   (customer_name, customer_email, customer_phone, date, meal,
                    time, guests, notes, privacy_consent, marketing_consent)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING id, customer_name, customer_email, customer_phone, date,
                         meal, time, guests, notes, privacy_consent,
                         marketing_consent, created_at"#,
        )
        .bind(req.customer_name.trim())
        .bind(req.customer_email.trim())
        .bind(req.customer_phone.trim())
        .bind(req.date)
        .bind(req.meal.to_string())
        .bind(&req.time)
        .bind(req.guests)
        .bind(req.notes.as_deref().filter(|n| !n.is_empty()))
        .bind(req.privacy_consent)
        .bind(req.marketing_consent)
        .fetch_one(pool)
        .await?;
        Ok(booking)
    }

    /// All bookings, newest first.
    pub async fn list(pool: &PgPool) -> anyhow::Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"SELECT id, customer_name, customer_email, customer_phone, date,
                      meal, time, guests, notes, privacy_consent,
                      marketing_consent, created_at
               FROM bookings
               ORDER BY created_at DESC"#,
        )
        .fetch_all(pool)
        .await?;
        Ok(bookings)
    }

    /// Returns false when no booking had the given id.
    pub async fn delete(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDateTime;

    use super::*;
    use crate::models::settings::keys;
    use crate::services::admission::Clock;
    use crate::services::settings::testing::MemoryStore;

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn open_gate() -> AdmissionGate {
        let store = Arc::new(MemoryStore::new().with_entry(keys::BOOKINGS_ENABLED, "true"));
        gate_with(store, "2026-02-01T10:00:00")
    }

    fn gate_with(store: Arc<MemoryStore>, now: &str) -> AdmissionGate {
        AdmissionGate::new(
            store,
            Arc::new(FixedClock(now.parse().unwrap())),
            "2026-02-14T19:00:00".parse().unwrap(),
        )
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn closed_weekday_is_rejected_even_when_gate_is_open() {
        let schedule = ScheduleEngine::default();
        // Tuesday
        let result = BookingService::validate(
            &schedule,
            &open_gate(),
            date("2026-02-17"),
            MealType::Dinner,
        )
        .await;
        assert_eq!(
            result,
            Err(BookingRejection::Closed {
                day: "martedì".into()
            })
        );
    }

    #[tokio::test]
    async fn wrong_meal_names_the_day_and_meal() {
        let schedule = ScheduleEngine::default();
        // Monday serves dinner only
        let result = BookingService::validate(
            &schedule,
            &open_gate(),
            date("2026-02-16"),
            MealType::Lunch,
        )
        .await;
        let rejection = result.unwrap_err();
        assert_eq!(rejection.code(), "wrong_meal");
        assert_eq!(
            rejection.to_string(),
            "Il lunedì non è disponibile il servizio pranzo"
        );
    }

    #[tokio::test]
    async fn available_day_is_rejected_when_gate_is_disabled() {
        let schedule = ScheduleEngine::default();
        let store = Arc::new(
            MemoryStore::new()
                .with_entry(keys::BOOKINGS_ENABLED, "false")
                .with_entry(keys::BOOKINGS_CLOSED_MESSAGE, "Chiuso per ferie"),
        );
        let gate = gate_with(store, "2026-02-01T10:00:00");
        // Saturday serves both meals
        let result =
            BookingService::validate(&schedule, &gate, date("2026-02-14"), MealType::Lunch).await;
        assert_eq!(
            result,
            Err(BookingRejection::AdminDisabled {
                message: "Chiuso per ferie".into()
            })
        );
    }

    #[tokio::test]
    async fn past_cutoff_is_rejected_as_event_closed() {
        let schedule = ScheduleEngine::default();
        let store = Arc::new(MemoryStore::new().with_entry(keys::BOOKINGS_ENABLED, "true"));
        let gate = gate_with(store, "2026-02-14T19:00:00");
        let result =
            BookingService::validate(&schedule, &gate, date("2026-02-14"), MealType::Dinner).await;
        assert_eq!(result, Err(BookingRejection::EventClosed));
    }

    #[tokio::test]
    async fn open_gate_and_available_meal_pass() {
        let schedule = ScheduleEngine::default();
        let result = BookingService::validate(
            &schedule,
            &open_gate(),
            date("2026-02-14"),
            MealType::Dinner,
        )
        .await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn schedule_gate_runs_before_the_admission_gate() {
        let schedule = ScheduleEngine::default();
        let store = Arc::new(MemoryStore::new());
        let gate = gate_with(store.clone(), "2026-02-01T10:00:00");
        // Closed weekday: rejected by the schedule without touching the store
        let result =
            BookingService::validate(&schedule, &gate, date("2026-02-17"), MealType::Dinner).await;
        assert_eq!(result.unwrap_err().code(), "closed");
        assert_eq!(store.read_count(), 0);
    }
}
