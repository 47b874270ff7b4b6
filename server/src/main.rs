use anyhow::{Context, Result};
use blob_server::http;
use std::{net::SocketAddr, sync::Arc};
use storage_backend::{ObjectStore, ObjectStoreBackend, StorageConfig, TransferOptions};
use tracing::{Level, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    info!("Starting blob server");

    // Initialize storage backend
    let storage_config = StorageConfig::from_env()?;
    let transfer = TransferOptions::from_env()?;

    let storage = ObjectStoreBackend::from_config(storage_config)
        .context("Failed to initialize storage backend")?
        .with_transfer_options(transfer)?;
    let storage: Arc<dyn ObjectStore> = Arc::new(storage);

    // Bind to address
    let addr = std::env::var("BIND_ADDRESS")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse::<SocketAddr>()?;

    // Start the HTTP server
    http::start_server(storage, addr).await?;

    Ok(())
}
