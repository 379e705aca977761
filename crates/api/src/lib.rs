//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The upload and listing endpoints
//! - Static serving of the public assets, playback and admin pages
//! - Error and panic to JSON response mapping

pub mod error;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::sync::Arc;

use audioqr_core::listing::ListingService;
use audioqr_core::storage::BlobStore;
use audioqr_core::upload::UploadService;
use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Directories static pages are served from.
#[derive(Debug, Clone)]
pub struct AssetDirs {
    /// Public assets; must contain `audio.html`.
    pub public_dir: PathBuf,
    /// Must contain `admin.html`.
    pub admin_dir: PathBuf,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload pipeline.
    pub uploads: Arc<UploadService>,
    /// Admin listing.
    pub listing: Arc<ListingService>,
    /// Blob store selected at startup.
    pub store: Arc<dyn BlobStore>,
    /// Static page locations.
    pub assets: Arc<AssetDirs>,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: u64,
}

impl AppState {
    /// Wire the services around a blob store.
    #[must_use]
    pub fn new(
        store: Arc<dyn BlobStore>,
        base_url: impl Into<String>,
        assets: AssetDirs,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            uploads: Arc::new(UploadService::new(store.clone(), base_url)),
            listing: Arc::new(ListingService::new(store.clone())),
            store,
            assets: Arc::new(assets),
            max_upload_bytes,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let public = ServeDir::new(&state.assets.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(error::not_found.into_service());

    Router::new()
        .merge(routes::app_routes(&state))
        .fallback_service(public)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
