use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use crate::config::Config;
use crate::models::settings::keys;

/// Generic key→value persistence consumed by the admission gate and the
/// notification-email override. Kept behind a trait so the gate can be tested
/// against an in-memory store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Create-or-replace, keyed by `key`. Never errors on first write vs
    /// overwrite; each key's upsert is independently atomic.
    async fn upsert(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Postgres-backed settings store over the `settings` table.
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value = sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn upsert(&self, key: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO settings (key, value) VALUES ($1, $2)
               ON CONFLICT (key) DO UPDATE SET
                   value = EXCLUDED.value,
                   updated_at = NOW()"#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Where booking notifications go: the stored override when present and
/// non-empty, otherwise the configured restaurant address. A store error falls
/// back to config — a notification must never be lost to a settings outage.
pub async fn notification_email(store: &dyn SettingsStore, config: &Config) -> String {
    match store.get(keys::NOTIFICATION_EMAIL).await {
        Ok(Some(v)) if !v.is_empty() => v,
        Ok(_) => config.restaurant_email.clone(),
        Err(e) => {
            warn!("settings read failed, using configured notification address: {e}");
            config.restaurant_email.clone()
        }
    }
}
