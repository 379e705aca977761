//! Playback and admin pages.

use axum::Router;
use tower_http::services::ServeFile;

use crate::{AppState, AssetDirs};

/// Creates the page routes. The player script reads the id from the path.
pub fn routes(assets: &AssetDirs) -> Router<AppState> {
    Router::new()
        .route_service(
            "/audio/{id}",
            ServeFile::new(assets.public_dir.join("audio.html")),
        )
        .route_service("/admin", ServeFile::new(assets.admin_dir.join("admin.html")))
}
