// mx-clabe - Web Server
// REST API for CLABE validation with Axum

use anyhow::{Context, Result};
use mx_clabe::{api, Config, CATALOGUE_SOURCE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mx_clabe=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CLABE validation server...");

    let config = Config::from_env().context("Failed to load configuration")?;
    let registry = config.registry().context("Failed to load bank catalogue")?;

    match &config.catalogue_path {
        Some(path) => tracing::info!(path = %path.display(), banks = registry.len(), "custom bank catalogue loaded"),
        None => tracing::info!(source = CATALOGUE_SOURCE, banks = registry.len(), "embedded bank catalogue loaded"),
    }

    let app = api::router(registry);

    let listener = tokio::net::TcpListener::bind(config.server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_addr))?;

    tracing::info!("Server running on http://{}", config.server_addr);
    tracing::info!("  API: http://{}/api/clabe/<CLABE>", config.server_addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
