use std::env;

use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub host: String,
    pub port: u16,
    /// Operator PIN for protected endpoints. When unset, every operator
    /// endpoint rejects with 401.
    pub booking_view_pin: Option<String>,
    pub restaurant_name: String,
    pub restaurant_address: String,
    pub restaurant_email: String,
    pub app_base_url: String,
    /// Event date the booking intake is tied to.
    pub event_date: NaiveDate,
    /// Local hour (0-23) on the event date after which intake closes for good.
    pub event_close_hour: u32,
    // SMTP (optional)
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            booking_view_pin: env::var("BOOKING_VIEW_PIN").ok().filter(|s| !s.is_empty()),
            restaurant_name: env::var("RESTAURANT_NAME")
                .unwrap_or_else(|_| "Torri dell'Acqua".into()),
            restaurant_address: env::var("RESTAURANT_ADDRESS").unwrap_or_else(|_| {
                "Via Dante Alighieri n. 8, 73040 Castrignano del Capo (LE)".into()
            }),
            restaurant_email: env::var("RESTAURANT_EMAIL")
                .unwrap_or_else(|_| "info@torridellacqua.it".into()),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost".into()),
            event_date: env::var("EVENT_DATE")
                .unwrap_or_else(|_| "2026-02-14".into())
                .parse()?,
            event_close_hour: {
                let hour: u32 = env::var("EVENT_CLOSE_HOUR")
                    .unwrap_or_else(|_| "19".into())
                    .parse()?;
                if hour > 23 {
                    anyhow::bail!("EVENT_CLOSE_HOUR must be 0-23, got {}", hour);
                }
                hour
            },
            smtp_host: env::var("SMTP_HOST").ok().filter(|s| !s.is_empty()),
            smtp_port: env::var("SMTP_PORT").ok().and_then(|v| v.parse().ok()),
            smtp_username: env::var("SMTP_USERNAME").ok().filter(|s| !s.is_empty()),
            smtp_password: env::var("SMTP_PASSWORD").ok().filter(|s| !s.is_empty()),
            smtp_from: env::var("SMTP_FROM").ok().filter(|s| !s.is_empty()),
        })
    }

    /// Absolute local instant after which the intake reports closed, regardless
    /// of the operator toggle.
    pub fn booking_cutoff(&self) -> NaiveDateTime {
        // event_close_hour is range-checked in from_env
        self.event_date
            .and_hms_opt(self.event_close_hour, 0, 0)
            .expect("hour validated at load")
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
