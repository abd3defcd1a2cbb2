use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::warn;

use crate::models::admission::{AdmissionState, AdmissionStatus, ClosedReason};
use crate::models::settings::keys;
use crate::services::settings::SettingsStore;

/// Fixed message once the event cutoff has passed.
pub const EVENT_CLOSED_MESSAGE: &str = "Le prenotazioni sono chiuse";

/// Fallback when the operator closed intake without a custom message.
pub const DEFAULT_CLOSED_MESSAGE: &str = "Le prenotazioni sono momentaneamente sospese";

/// Source of "now" in local civil time, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Global intake switch: a hard temporal cutoff tied to the event, then the
/// operator-controlled `bookings_enabled` / `bookings_closed_message` pair in
/// the settings store.
///
/// Reads fail open — a settings outage must never block the public booking
/// form. Writes fail loud so the operator sees a toggle that did not stick.
pub struct AdmissionGate {
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    cutoff: NaiveDateTime,
}

impl AdmissionGate {
    pub fn new(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>, cutoff: NaiveDateTime) -> Self {
        Self {
            store,
            clock,
            cutoff,
        }
    }

    /// Current intake status, as shown to customers.
    ///
    /// The cutoff check runs before any store access: once the event closing
    /// instant has passed, no operator toggle can reopen the intake. An absent
    /// `bookings_enabled` key reads as disabled — intake stays closed until an
    /// operator explicitly opens it.
    pub async fn check_status(&self) -> AdmissionStatus {
        if self.clock.now() >= self.cutoff {
            return AdmissionStatus {
                enabled: false,
                reason: Some(ClosedReason::EventClosed),
                message: Some(EVENT_CLOSED_MESSAGE.to_string()),
            };
        }

        let (enabled, message) = tokio::join!(
            self.store.get(keys::BOOKINGS_ENABLED),
            self.store.get(keys::BOOKINGS_CLOSED_MESSAGE),
        );

        let (enabled, message) = match (enabled, message) {
            (Ok(enabled), Ok(message)) => (enabled, message),
            (Err(e), _) | (_, Err(e)) => {
                warn!("settings read failed, failing open: {e}");
                return AdmissionStatus::open();
            }
        };

        if enabled.as_deref() == Some("true") {
            return AdmissionStatus::open();
        }

        AdmissionStatus {
            enabled: false,
            reason: Some(ClosedReason::AdminDisabled),
            message: Some(
                message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_CLOSED_MESSAGE.to_string()),
            ),
        }
    }

    /// Operator toggle. Upserts the enabled flag, and the closed message only
    /// when one was supplied. Store errors propagate to the caller.
    pub async fn toggle(
        &self,
        enabled: bool,
        message: Option<&str>,
    ) -> anyhow::Result<AdmissionState> {
        self.store
            .upsert(keys::BOOKINGS_ENABLED, if enabled { "true" } else { "false" })
            .await?;

        if let Some(message) = message {
            self.store
                .upsert(keys::BOOKINGS_CLOSED_MESSAGE, message)
                .await?;
        }

        Ok(AdmissionState {
            enabled,
            message: message.map(|m| m.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::settings::testing::MemoryStore;

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    const CUTOFF: &str = "2026-02-14T19:00:00";
    const BEFORE: &str = "2026-02-01T10:00:00";
    const AFTER: &str = "2026-02-14T19:00:01";

    fn at(ts: &str) -> NaiveDateTime {
        ts.parse().unwrap()
    }

    fn gate(store: Arc<MemoryStore>, now: &str) -> AdmissionGate {
        AdmissionGate::new(store, Arc::new(FixedClock(at(now))), at(CUTOFF))
    }

    #[tokio::test]
    async fn closed_by_default_when_flag_absent() {
        let status = gate(Arc::new(MemoryStore::new()), BEFORE).check_status().await;
        assert!(!status.enabled);
        assert_eq!(status.reason, Some(ClosedReason::AdminDisabled));
        assert_eq!(status.message.as_deref(), Some(DEFAULT_CLOSED_MESSAGE));
    }

    #[tokio::test]
    async fn open_when_flag_is_true() {
        let store = Arc::new(MemoryStore::new().with_entry(keys::BOOKINGS_ENABLED, "true"));
        let status = gate(store, BEFORE).check_status().await;
        assert_eq!(status, AdmissionStatus::open());
    }

    #[tokio::test]
    async fn custom_message_is_reported_when_disabled() {
        let store = Arc::new(
            MemoryStore::new()
                .with_entry(keys::BOOKINGS_ENABLED, "false")
                .with_entry(keys::BOOKINGS_CLOSED_MESSAGE, "Chiuso per ferie"),
        );
        let status = gate(store, BEFORE).check_status().await;
        assert!(!status.enabled);
        assert_eq!(status.reason, Some(ClosedReason::AdminDisabled));
        assert_eq!(status.message.as_deref(), Some("Chiuso per ferie"));
    }

    #[tokio::test]
    async fn empty_message_falls_back_to_default() {
        let store = Arc::new(
            MemoryStore::new()
                .with_entry(keys::BOOKINGS_ENABLED, "false")
                .with_entry(keys::BOOKINGS_CLOSED_MESSAGE, ""),
        );
        let status = gate(store, BEFORE).check_status().await;
        assert_eq!(status.message.as_deref(), Some(DEFAULT_CLOSED_MESSAGE));
    }

    #[tokio::test]
    async fn read_failure_fails_open() {
        let mut store = MemoryStore::new();
        store.fail_reads = true;
        let status = gate(Arc::new(store), BEFORE).check_status().await;
        assert_eq!(status, AdmissionStatus::open());
    }

    #[tokio::test]
    async fn cutoff_short_circuits_before_any_store_read() {
        let store = Arc::new(MemoryStore::new().with_entry(keys::BOOKINGS_ENABLED, "true"));
        let status = gate(store.clone(), AFTER).check_status().await;
        assert!(!status.enabled);
        assert_eq!(status.reason, Some(ClosedReason::EventClosed));
        assert_eq!(status.message.as_deref(), Some(EVENT_CLOSED_MESSAGE));
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn cutoff_instant_itself_counts_as_closed() {
        let store = Arc::new(MemoryStore::new().with_entry(keys::BOOKINGS_ENABLED, "true"));
        let status = gate(store, CUTOFF).check_status().await;
        assert_eq!(status.reason, Some(ClosedReason::EventClosed));
    }

    #[tokio::test]
    async fn toggle_then_check_reports_the_operator_message() {
        let store = Arc::new(MemoryStore::new());
        let g = gate(store.clone(), BEFORE);

        let state = g.toggle(false, Some("Chiuso per ferie")).await.unwrap();
        assert!(!state.enabled);
        assert_eq!(state.message.as_deref(), Some("Chiuso per ferie"));

        let status = g.check_status().await;
        assert!(!status.enabled);
        assert_eq!(status.reason, Some(ClosedReason::AdminDisabled));
        assert_eq!(status.message.as_deref(), Some("Chiuso per ferie"));

        g.toggle(true, None).await.unwrap();
        assert!(g.check_status().await.enabled);
    }

    #[tokio::test]
    async fn toggle_writes_string_flag_and_skips_absent_message() {
        let store = Arc::new(MemoryStore::new());
        let g = gate(store.clone(), BEFORE);

        g.toggle(true, None).await.unwrap();
        assert_eq!(store.value(keys::BOOKINGS_ENABLED).as_deref(), Some("true"));
        assert_eq!(store.value(keys::BOOKINGS_CLOSED_MESSAGE), None);

        g.toggle(false, None).await.unwrap();
        assert_eq!(store.value(keys::BOOKINGS_ENABLED).as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn toggle_propagates_write_errors() {
        let mut store = MemoryStore::new();
        store.fail_writes = true;
        let g = gate(Arc::new(store), BEFORE);
        assert!(g.toggle(false, Some("Chiuso")).await.is_err());
    }
}
