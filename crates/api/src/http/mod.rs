//! HTTP surface (axum).

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

pub use error::ApiError;
pub use routes::TOKEN_HEADER;

use crate::AppContext;

/// Build the application router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/polls", post(routes::create_poll))
        .route("/api/polls/{id}", get(routes::get_poll))
        .route("/api/polls/{id}/responses", post(routes::submit_response))
        .route("/api/polls/{id}/responses/{response_id}", delete(routes::delete_response))
        .route("/api/polls/{id}/days", put(routes::update_days))
        .route("/api/stats", get(routes::stats))
        .route("/api/calendar", get(routes::calendar))
        .route("/health", get(routes::health))
        .with_state(ctx)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn serve(ctx: Arc<AppContext>, listener: TcpListener) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        info!(%address, "server running");
    }
    axum::serve(listener, router(ctx)).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install signal handler");
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
}
