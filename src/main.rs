use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod db;
mod model;
mod service;

use app::AppState;
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(&config)
        .await
        .expect("Failed to initialize application");

    let db_pool = web::Data::from(state.db_pool.clone());
    let manuscripts = web::Data::new(state.manuscripts.clone());
    let progress = web::Data::new(state.progress.clone());
    let audit_service = web::Data::from(state.audit_service.clone());
    let rate_limiter = web::Data::from(state.rate_limiter.clone());

    tracing::info!("Starting paperaudit server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(db_pool.clone())
            .app_data(manuscripts.clone())
            .app_data(progress.clone())
            .app_data(audit_service.clone())
            .app_data(rate_limiter.clone())
            .configure(api::manuscript::configure)
            .configure(api::audit::configure)
            .configure(api::progress::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
