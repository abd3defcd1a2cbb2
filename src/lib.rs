// Library exports for the api binary and tests
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use config::Config;
use services::admission::AdmissionGate;
use services::email::EmailService;
use services::schedule::ScheduleEngine;
use services::settings::SettingsStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub redis: redis::aio::MultiplexedConnection,
    pub config: Arc<Config>,
    pub schedule: Arc<ScheduleEngine>,
    pub admission: Arc<AdmissionGate>,
    pub settings: Arc<dyn SettingsStore>,
    pub email: Option<Arc<EmailService>>,
}
