//! # Quill Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use quill_infra::InMemoryRateLimiter;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::rate_limit::RateLimitMiddleware;
use quill_core::ports::RateLimiter;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Quill on {}:{}", config.host, config.port);

    let state = AppState::new(&config).await;
    let tokens = state::token_service(&config);
    let share_limiter: Arc<dyn RateLimiter> =
        Arc::new(InMemoryRateLimiter::new(config.share_rate_limit.clone()));

    let trust_proxy_headers = config.trust_proxy_headers;
    if !trust_proxy_headers {
        tracing::info!("Forwarded headers ignored; set TRUST_PROXY_HEADERS behind a reverse proxy");
    }

    HttpServer::new(move || {
        let share_guard = RateLimitMiddleware::new(share_limiter.clone())
            .trust_proxy_headers(trust_proxy_headers);
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .configure(move |cfg| handlers::configure_routes(cfg, share_guard))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
