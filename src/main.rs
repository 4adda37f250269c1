//! Customer Records Server - Main Application Entry Point
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: Basic auth against `managers`, or bearer tokens
//! - **Format**: JSON responses, bare status text on errors
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build the interceptor chain and router
//! 5. Serve until Ctrl-C or SIGTERM

use std::sync::Arc;

use customer_records_server::{
    app,
    config::{AuthScheme, Config},
    db,
    middleware::{InterceptorChain, basic::BasicAuth, token::TokenAuth},
    services::{
        customer_service::PgCustomerService,
        security_service::{PgAuthenticator, PgTokenResolver},
    },
    state::AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG, defaults to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let chain = match config.auth_scheme {
        AuthScheme::Basic => {
            InterceptorChain::new().with(BasicAuth::new(Arc::new(PgAuthenticator::new(pool.clone()))))
        }
        AuthScheme::Token => {
            InterceptorChain::new().with(TokenAuth::new(Arc::new(PgTokenResolver::new(pool.clone()))))
        }
    };
    tracing::info!(scheme = ?config.auth_scheme, "Authentication configured");

    let state = AppState::new(Arc::new(PgCustomerService::new(pool.clone())));
    let router = app::build_router(state, chain, config.request_timeout());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
