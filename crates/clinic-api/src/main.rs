use anyhow::Context;
use tracing_subscriber::EnvFilter;

use clinic_api::{router, AppContext, Config};
use clinic_core::db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env().context("reading configuration")?;
    if config.tokens.is_empty() {
        tracing::warn!("CLINIC_API_TOKENS is empty, all requests will be rejected");
    }

    let db = Database::open(&config.db_path)
        .with_context(|| format!("opening database at {}", config.db_path))?;
    tracing::info!(path = %config.db_path, "database ready");

    let ctx = AppContext::new(db, config.auth_registry(), config.doctor_name.clone());

    // Log queue changes as they happen
    let mut queue_rx = ctx.events.subscribe();
    tokio::spawn(async move {
        while queue_rx.recv().await.is_ok() {
            tracing::debug!("queue updated");
        }
    });

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!(addr = %config.bind, "listening");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}
