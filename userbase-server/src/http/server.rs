//! Axum server setup
//!
//! Server skeleton with:
//! - Request logging and tracing middleware
//! - Whole-request timeout
//! - Graceful shutdown on SIGTERM/Ctrl+C with a drain deadline

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::logging::log_requests;
use super::routes;
use crate::db::UserStore;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,

    /// Upper bound for handling a single request
    pub request_timeout: Duration,

    /// How long in-flight requests may drain after a shutdown signal
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_timeout: Duration::from_secs(15),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

/// Build the application router with all routes
pub fn build_router(store: Arc<dyn UserStore>, request_timeout: Duration) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::users::router())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState::new(store)))
}

/// Run the HTTP server until a shutdown signal, then close the store.
///
/// # Example
///
/// ```ignore
/// let store = PgUserStore::connect(&PostgresConfig::default()).await?;
/// run_server(Arc::new(store), ServerConfig::default()).await?;
/// ```
pub async fn run_server(store: Arc<dyn UserStore>, config: ServerConfig) -> crate::Result<()> {
    let app = build_router(store.clone(), config.request_timeout);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    let signalled = Arc::new(Notify::new());
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown({
        let signalled = signalled.clone();
        async move {
            shutdown_signal().await;
            signalled.notify_one();
        }
    })
    .into_future();

    let drain_deadline = async {
        signalled.notified().await;
        tokio::time::sleep(config.shutdown_timeout).await;
    };

    tokio::select! {
        result = server => result?,
        _ = drain_deadline => {
            tracing::warn!(
                timeout = ?config.shutdown_timeout,
                "in-flight requests did not drain in time, forcing shutdown"
            );
        }
    }

    store.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
