use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use torri_api::config::Config;
use torri_api::db;
use torri_api::middleware::auth::ViewPin;
use torri_api::routes;
use torri_api::services::admission::{AdmissionGate, SystemClock};
use torri_api::services::email::EmailService;
use torri_api::services::schedule::ScheduleEngine;
use torri_api::services::settings::{PgSettingsStore, SettingsStore};
use torri_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let redis_client = redis::Client::open(config.redis_url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;
    info!("Redis connected");

    let schedule = Arc::new(ScheduleEngine::default());
    let settings: Arc<dyn SettingsStore> = Arc::new(PgSettingsStore::new(pool.clone()));
    let admission = Arc::new(AdmissionGate::new(
        settings.clone(),
        Arc::new(SystemClock),
        config.booking_cutoff(),
    ));
    info!(
        "Booking intake cutoff set to {}",
        config.booking_cutoff()
    );

    let email = EmailService::new(&config).map(Arc::new);
    if email.is_some() {
        info!("SMTP email service configured");
    } else {
        info!("SMTP not configured — email features disabled");
    }

    let state = AppState {
        db: pool,
        redis: redis_conn,
        config: config.clone(),
        schedule,
        admission,
        settings,
        email,
    };

    // Build CORS: allow the configured site origin. In development
    // (localhost), all origins are allowed.
    let cors_origin = {
        let base = config.app_base_url.clone();
        AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            let o = match origin.to_str() {
                Ok(s) => s,
                Err(_) => return false,
            };
            if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
                return true;
            }
            o == base
        })
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-view-pin"),
            header::HeaderName::from_static("x-real-ip"),
        ]))
        .allow_origin(cors_origin);

    let view_pin = ViewPin(config.booking_view_pin.clone());

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        // Calendar
        .route("/availability", get(routes::availability::get_availability))
        .route("/availability/slots", get(routes::availability::get_time_slots))
        // Bookings
        .route(
            "/bookings",
            get(routes::bookings::list_bookings).post(routes::bookings::create_booking),
        )
        .route("/bookings/{id}", delete(routes::bookings::delete_booking))
        .route(
            "/bookings/status",
            get(routes::booking_status::get_status)
                .post(routes::booking_status::toggle_bookings),
        )
        // Operator settings
        .route(
            "/settings",
            get(routes::settings::get_settings).post(routes::settings::update_settings),
        )
        .layer(axum::Extension(view_pin))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("{} booking API listening on {}", config.restaurant_name, addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
