//! Region Scaffold - API Server Binary
//!
//! This binary starts the HTTP API server for the region scaffold.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin region-api
//!
//! # Run against process memory instead of PostgreSQL
//! API_STORAGE=memory cargo run --bin region-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_DATABASE_URL` - PostgreSQL connection string (falls back to `DATABASE_URL`)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_APP_NAME` - Prefix of alert headers (default: regionApp)
//! * `API_DEFAULT_PAGE_SIZE` / `API_MAX_PAGE_SIZE` - Page size defaults (20 / 2000)
//! * `API_STORAGE` - `postgres` or `memory` (default: postgres)
//! * `API_STATEMENT_TIMEOUT_MS` - Per-statement timeout, 0 to disable (default: 30000)

use anyhow::Context;
use infra_db::{create_pool, DatabaseConfig, InMemoryEntityStore};
use interface_api::{
    config::{ApiConfig, StorageBackend},
    create_router, Stores,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, opens the configured store,
/// and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config()?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        "Starting region API server"
    );

    let stores = open_stores(&config).await?;

    let app = create_router(stores, config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from `API_*` environment variables.
fn load_config() -> anyhow::Result<ApiConfig> {
    let mut config = ApiConfig::from_env().context("Failed to load API configuration")?;
    if std::env::var("API_DATABASE_URL").is_err() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
    }
    Ok(config)
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Opens the configured store and checks that it answers.
async fn open_stores(config: &ApiConfig) -> anyhow::Result<Stores> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Ok(Stores::memory(InMemoryEntityStore::new()))
        }
        StorageBackend::Postgres => {
            tracing::info!("Connecting to database...");

            let mut db_config = DatabaseConfig::new(config.database_url.as_str());
            if let Some(timeout) = config.statement_timeout() {
                db_config = db_config.statement_timeout(timeout);
            }
            let pool = create_pool(db_config)
                .await
                .context("Failed to connect to database")?;

            let stores = Stores::postgres(pool);
            stores
                .probe
                .ping()
                .await
                .context("Database is not answering")?;

            tracing::info!("Database ready");
            Ok(stores)
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
