//! Shopify Connect server entry point.

use anyhow::{Context, Result};
use tracing::info;

use shopify_connect::auth::oauth::ShopifyClient;
use shopify_connect::server::{self, AppState};
use shopify_connect::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopify_connect=info,tower_http=info".into()),
        )
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().context("invalid configuration")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        api_version = %config.api_version(),
        scopes = %config.scopes(),
        "Starting Shopify Connect"
    );

    let bind_address = config.bind_address();
    let app = server::create_router(AppState::new(config, ShopifyClient::new()));

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!(address = %bind_address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
