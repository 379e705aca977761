//! Audio upload endpoint.

use audioqr_core::storage::AudioUpload;
use audioqr_core::upload::UploadResult;
use audioqr_shared::{AppError, AppResult};
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    routing::post,
};
use tracing::{debug, error, warn};

use crate::AppState;
use crate::error::ApiError;

/// Multipart field the audio file is read from.
pub const AUDIO_FIELD: &str = "audio";

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// Creates the upload route with a body limit derived from the file limit.
pub fn routes(max_upload_bytes: u64) -> Router<AppState> {
    let limit = usize::try_from(max_upload_bytes.saturating_add(MULTIPART_OVERHEAD))
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/upload", post(upload_audio))
        .layer(DefaultBodyLimit::max(limit))
}

/// POST /upload
///
/// Anything that is not a multipart body is treated as a request without a
/// file.
async fn upload_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResult>, ApiError> {
    let file = match multipart {
        Ok(multipart) => read_audio_field(multipart).await?,
        Err(rejection) => {
            debug!(%rejection, "Upload request is not multipart");
            None
        }
    };

    let result = state.uploads.upload(file).await.map_err(|e| {
        let cause = e.to_string();
        let err = AppError::from(e);
        if err.is_client_error() {
            warn!(error = %cause, "Upload rejected");
        } else {
            error!(error = %cause, "Upload failed");
        }
        ApiError(err)
    })?;

    Ok(Json(result))
}

/// Pull the single file part named [`AUDIO_FIELD`]; other parts are skipped.
async fn read_audio_field(mut multipart: Multipart) -> AppResult<Option<AudioUpload>> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        // Browsers send an empty filename when no file was chosen.
        let Some(original_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
        else {
            continue;
        };
        if upload.is_some() {
            return Err(AppError::bad_request("Only one file may be uploaded"));
        }
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        upload = Some(AudioUpload::new(original_name, content_type, bytes));
    }

    Ok(upload)
}

fn multipart_error(err: MultipartError) -> AppError {
    warn!(error = %err, "Malformed upload body");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::bad_request("File too large")
    } else {
        AppError::bad_request(err.body_text())
    }
}
