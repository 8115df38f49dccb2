//! Order desk server - HTTP API for customers, items and orders.
//!
//! Serves on `ORDER_DESK_HOST:ORDER_DESK_PORT` (127.0.0.1:8000 by default).
//! The database schema is created on start-up if it is missing.

#![cfg_attr(not(test), forbid(unsafe_code))]

use order_desk_server::config::ServerConfig;
use order_desk_server::state::AppState;
use order_desk_server::{db, routes, telemetry};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Sentry before the subscriber so its layer has a client to report to
    let _sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing(config.log_format);

    let pool = db::create_pool(&config.database_url, config.max_connections)
        .await
        .expect("Failed to open database");
    db::init_schema(&pool)
        .await
        .expect("Failed to create database schema");
    tracing::info!(
        database_url = %config.database_url,
        max_connections = config.max_connections,
        "Database ready"
    );

    let addr = config.socket_addr();
    let app = routes::app(AppState::new(pool.clone()))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Order desk listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Database pool closed");
}

/// Resolve on Ctrl+C, or on SIGTERM where available.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received, draining connections");
}
