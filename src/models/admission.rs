use serde::{Deserialize, Serialize};

/// Why the intake is reporting closed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClosedReason {
    /// The event cutoff instant has passed — not overridable by the operator.
    EventClosed,
    /// The operator switched intake off.
    AdminDisabled,
}

/// Public answer of GET /bookings/status.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AdmissionStatus {
    pub enabled: bool,
    pub reason: Option<ClosedReason>,
    pub message: Option<String>,
}

impl AdmissionStatus {
    pub fn open() -> Self {
        Self {
            enabled: true,
            reason: None,
            message: None,
        }
    }
}

/// The operator-visible switch state as committed by a toggle.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AdmissionState {
    pub enabled: bool,
    pub message: Option<String>,
}

/// Body for POST /bookings/status (operator toggle).
#[derive(Debug, Deserialize)]
pub struct ToggleBookingsRequest {
    pub enabled: bool,
    /// Custom closed message; left untouched when absent.
    pub message: Option<String>,
}
