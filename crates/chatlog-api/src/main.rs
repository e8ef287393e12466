// Chatlog API server
// Decision: Persist after every mutation, plus one capped final flush on shutdown

use anyhow::{Context, Result};
use axum::http::{header, Method};
use chatlog_api::config::ServerConfig;
use chatlog_api::{build_router, AppState};
use chatlog_core::EventStore;
use chatlog_storage::JsonFileGateway;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chatlog_api=debug,chatlog_core=info,chatlog_storage=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("chatlog-api starting...");

    let config = ServerConfig::from_env();
    tracing::info!(
        address = %config.bind_address(),
        data_dir = %config.data_dir.display(),
        shutdown_flush_timeout_secs = config.shutdown_flush_timeout.as_secs(),
        "Configuration loaded"
    );

    // Load persisted state
    let gateway = JsonFileGateway::open(&config.data_dir)
        .await
        .context("Failed to prepare data directory")?;
    let store = Arc::new(EventStore::open(Arc::new(gateway)).await);

    let app = build_router(AppState::new(store.clone()));

    // Add CORS layer only if origins are configured
    let app = if !config.cors_allowed_origins.is_empty() {
        tracing::info!(origins = ?config.cors_allowed_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_allowed_origins.clone()))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]),
        )
    } else {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    };

    // Start HTTP server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // No request is in flight any more; persist whatever memory holds
    match tokio::time::timeout(config.shutdown_flush_timeout, store.shutdown_flush()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Final flush failed"),
        Err(_) => tracing::error!(
            timeout_secs = config.shutdown_flush_timeout.as_secs(),
            "Final flush timed out"
        ),
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Received shutdown signal");
}
