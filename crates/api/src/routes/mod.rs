//! Route definitions.

use axum::Router;

use crate::AppState;

pub mod files;
pub mod health;
pub mod pages;
pub mod upload;

/// Creates the router with every dynamic and page route.
///
/// Which `/files` routes exist depends on the blob store: a local store is
/// served straight from disk, a cloud store redirects to the provider.
pub fn app_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(upload::routes(state.max_upload_bytes))
        .merge(files::routes(state.store.as_ref()))
        .merge(pages::routes(&state.assets))
}
