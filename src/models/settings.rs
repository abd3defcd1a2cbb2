use serde::Deserialize;

/// Settings key names. Everything shares one generic key/value table,
/// distinguished only by key.
pub mod keys {
    pub const BOOKINGS_ENABLED: &str = "bookings_enabled";
    pub const BOOKINGS_CLOSED_MESSAGE: &str = "bookings_closed_message";
    pub const NOTIFICATION_EMAIL: &str = "notification_email";
}

/// Body for POST /settings — fields are applied only when present.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub notification_email: Option<String>,
}
