use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};

lazy_static! {
    // ── Event counters (increment on each event) ────────────────────────────
    pub static ref BOOKINGS_COUNTER: CounterVec = register_counter_vec!(
        "api_bookings_total",
        "Richieste di prenotazione per esito",
        &["outcome"]
    ).unwrap();

    pub static ref BOOKING_REJECTIONS_COUNTER: CounterVec = register_counter_vec!(
        "api_booking_rejections_total",
        "Prenotazioni rifiutate per motivo",
        &["reason"]
    ).unwrap();

    pub static ref ADMISSION_TOGGLES_COUNTER: CounterVec = register_counter_vec!(
        "api_admission_toggles_total",
        "Cambi dell'interruttore prenotazioni",
        &["enabled"]
    ).unwrap();

    pub static ref EMAILS_COUNTER: CounterVec = register_counter_vec!(
        "api_emails_total",
        "Email inviate per tipo e stato",
        &["kind", "status"]
    ).unwrap();
}
