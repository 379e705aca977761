//! Upload service implementation.

use std::sync::Arc;

use tracing::{info, warn};

use super::error::UploadError;
use super::types::UploadResult;
use crate::qr::QrEncoder;
use crate::storage::{AudioUpload, BlobStore};

/// Path segment playback pages live under.
pub const AUDIO_ROUTE: &str = "/audio";

/// Public playback URL for a stored object.
#[must_use]
pub fn playback_url(base_url: &str, stored_id: &str) -> String {
    format!("{}{AUDIO_ROUTE}/{stored_id}", base_url.trim_end_matches('/'))
}

/// Orchestrates one upload: store, derive URL, render QR.
pub struct UploadService {
    store: Arc<dyn BlobStore>,
    qr: QrEncoder,
    base_url: String,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            qr: QrEncoder::default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Store an uploaded file and return its playback URL and QR code.
    ///
    /// A missing file is rejected before storage is touched. If QR
    /// generation fails the stored object is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No file was provided
    /// - The store rejects or fails to persist the file
    /// - QR generation fails
    pub async fn upload(&self, file: Option<AudioUpload>) -> Result<UploadResult, UploadError> {
        let file = file.ok_or(UploadError::MissingFile)?;
        let original_name = file.original_name.clone();
        let size = file.size();

        let stored = self.store.store(file).await?;
        let audio_url = playback_url(&self.base_url, &stored.id);

        let qr_code = self.qr.to_data_uri(&audio_url).map_err(|source| {
            warn!(
                stored_id = %stored.id,
                error = %source,
                "QR generation failed; stored object is kept"
            );
            UploadError::Encoding {
                stored_id: stored.id.clone(),
                source,
            }
        })?;

        info!(
            stored_id = %stored.id,
            original_name = %original_name,
            size,
            provider = self.store.provider_name(),
            "Audio uploaded"
        );

        Ok(UploadResult { audio_url, qr_code })
    }
}
