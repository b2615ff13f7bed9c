//! Application bootstrapper
//!
//! Handles all initialization and setup for the Habesha Expat admin backend.

use std::net::SocketAddr;

use axum::Router;
use http::HeaderValue;
use tokio::task::JoinHandle;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CONFIG;
use crate::db::{self, DbConn};
use crate::endpoints;
use crate::services::AuditLogger;
use crate::state::AppState;

/// Bootstrap and run the application
pub async fn run() -> anyhow::Result<()> {
    // .env is optional; real deployments inject the environment directly
    let dotenv = dotenvy::dotenv();

    init_tracing();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to read .env file: {}", e),
    }

    CONFIG.auth.ensure_secret()?;

    tracing::info!("Starting Habesha Expat admin backend v{}", env!("CARGO_PKG_VERSION"));

    let (state, audit_worker) = init_services().await?;
    let conn = state.db.clone();

    let app = create_app(state);

    serve(app).await?;

    shutdown(conn, audit_worker).await;

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("habesha_admin={},tower_http=info", CONFIG.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .init();
}

/// Initialize all application services
async fn init_services() -> anyhow::Result<(AppState, JoinHandle<()>)> {
    let conn = db::connect().await?;
    tracing::info!("Database connection established");

    let (audit, audit_worker) = AuditLogger::spawn(conn.clone(), CONFIG.audit.queue_capacity);
    tracing::info!(capacity = CONFIG.audit.queue_capacity, "Audit worker started");

    Ok((AppState::new(conn, audit), audit_worker))
}

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    endpoints::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&CONFIG.server.allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Start the HTTP server and block until a shutdown signal arrives
async fn serve(app: Router) -> anyhow::Result<()> {
    let listener =
        tokio::net::TcpListener::bind((CONFIG.server.host.as_str(), CONFIG.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Drain queued audit records, then release the pool
async fn shutdown(conn: DbConn, audit_worker: JoinHandle<()>) {
    tracing::info!("Draining audit queue...");
    if let Err(e) = audit_worker.await {
        tracing::error!("Audit worker terminated abnormally: {}", e);
    }

    if let Err(e) = conn.close().await {
        tracing::warn!("Failed to close database pool: {}", e);
    }

    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
