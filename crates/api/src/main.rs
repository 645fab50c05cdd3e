//! bffhang - group hangout day polls
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use bffhang_api::AppContext;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const LOG_FORMAT_ENV: &str = "BFFHANG_LOG_FORMAT";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV).map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the subscriber reads RUST_LOG.
    let dotenv = dotenvy::dotenv();
    init_tracing();

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env file loaded"),
    }

    tracing::info!("bffhang starting...");

    let ctx = AppContext::new().context("failed to initialise application context")?;
    let bind_address = ctx.config.server.bind_address.clone();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    bffhang_api::serve(Arc::new(ctx), listener).await.context("server error")?;
    Ok(())
}
