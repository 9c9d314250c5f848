use anyhow::Context;
use google_drive_connector::{server, ConnectorConfig, ContentGateway};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ConnectorConfig::from_env().context("Invalid configuration")?;

    // Credential problems are logged here and reported per request.
    let gateway = Arc::new(ContentGateway::connect(&config).await);
    info!(folder_id = %gateway.folder_id(), "Starting Google Drive connector");

    server::serve(config.socket_addr(), server::router(gateway))
        .await
        .context("HTTP server failed")?;

    Ok(())
}
