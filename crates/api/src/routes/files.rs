//! Stored file listing and retrieval.

use audioqr_core::listing::ListedFile;
use audioqr_core::storage::{BlobStore, FILES_ROUTE};
use audioqr_shared::AppError;
use axum::{
    Json, Router,
    extract::{Path, State},
    handler::HandlerWithoutStateExt,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use tower_http::services::ServeDir;
use tracing::error;

use crate::AppState;
use crate::error::{ApiError, not_found};

/// Creates the listing route and the retrieval route for `store`.
///
/// A store with a local root is served straight from disk; any other store
/// gets a redirect to its own retrieval URL.
pub fn routes(store: &dyn BlobStore) -> Router<AppState> {
    let router = Router::new().route("/api/files", get(list_files));

    match store.local_root() {
        Some(root) => router.nest_service(
            FILES_ROUTE,
            ServeDir::new(root).not_found_service(not_found.into_service()),
        ),
        None => router.route(&format!("{FILES_ROUTE}/{{id}}"), get(redirect_to_store)),
    }
}

/// GET /api/files
async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<ListedFile>>, ApiError> {
    let files = state.listing.list_files().await.map_err(|e| {
        error!(error = %e, provider = state.store.provider_name(), "Listing failed");
        AppError::Storage("Failed to read uploads".to_string())
    })?;

    Ok(Json(files))
}

/// GET /files/{id} for remote stores.
async fn redirect_to_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    (
        StatusCode::FOUND,
        [(header::LOCATION, state.store.retrieval_url(&id))],
    )
}
