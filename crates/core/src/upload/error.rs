//! Upload error types.

use audioqr_shared::AppError;
use thiserror::Error;

use crate::qr::QrError;
use crate::storage::StorageError;

/// Upload pipeline errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The request carried no file under the expected field.
    #[error("no file uploaded")]
    MissingFile,

    /// Storage rejected or failed to persist the file.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The file was stored but its QR code could not be generated.
    #[error("QR encoding failed for stored object {stored_id}: {source}")]
    Encoding {
        /// Identifier of the object left in storage.
        stored_id: String,
        /// Underlying encoder error.
        source: QrError,
    },
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::MissingFile => Self::BadRequest("No file uploaded".to_string()),
            UploadError::Storage(e) if e.is_rejection() => Self::BadRequest(capitalize(&e.to_string())),
            UploadError::Storage(_) => Self::Storage("Upload failed".to_string()),
            UploadError::Encoding { .. } => Self::Encoding("QR generation failed".to_string()),
        }
    }
}

fn capitalize(msg: &str) -> String {
    let mut chars = msg.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_bad_request() {
        let err = AppError::from(UploadError::MissingFile);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "No file uploaded");
    }

    #[test]
    fn test_rejections_are_bad_requests() {
        let err = AppError::from(UploadError::Storage(StorageError::file_too_large(10, 5)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "File size 10 bytes exceeds maximum allowed 5 bytes"
        );

        let err = AppError::from(UploadError::Storage(StorageError::unsupported_format("exe")));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_backend_failures_hide_detail() {
        let err = AppError::from(UploadError::Storage(StorageError::Http(
            "connection refused to 10.0.0.1".into(),
        )));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "Upload failed");
    }
}
