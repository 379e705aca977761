//! Audio QR server
//!
//! Main entry point: upload audio, get back a playback link and its QR code.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audioqr_api::{AppState, AssetDirs, create_router};
use audioqr_core::storage::{self, StorageConfig, StorageProvider};
use audioqr_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audioqr=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Select the blob store
    let provider = match config.cloudinary() {
        Some(cloud) => StorageProvider::cloudinary(
            cloud.cloud_name,
            cloud.api_key,
            cloud.api_secret,
            cloud.folder,
        ),
        None => StorageProvider::local_fs(&config.upload_dir),
    };
    let store = storage::from_config(
        StorageConfig::new(provider).with_max_file_size(config.max_upload_bytes),
    )?;
    info!(
        provider = store.provider_name(),
        max_upload_bytes = config.max_upload_bytes,
        "Storage configured"
    );

    // Create application state
    let base_url = config.base_url();
    let state = AppState::new(
        store,
        base_url.clone(),
        AssetDirs {
            public_dir: config.public_dir.clone(),
            admin_dir: config.admin_dir.clone(),
        },
        config.max_upload_bytes,
    );

    // Create router
    let app = create_router(state);

    // Start server
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);
    info!("Server running on {}", base_url);

    axum::serve(listener, app).await?;

    Ok(())
}
