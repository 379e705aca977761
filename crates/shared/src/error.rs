//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// The message is what the client sees, so server-side variants should carry
/// a fixed, human-readable summary rather than the underlying cause.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid client input.
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Blob store write, read or query failure.
    #[error("{0}")]
    Storage(String),

    /// QR code generation failure.
    #[error("{0}")]
    Encoding(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::Storage(_) | Self::Encoding(_) | Self::Internal(_) => 500,
        }
    }

    /// Whether the error is the caller's fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::BadRequest(String::new()), 400)]
    #[case(AppError::NotFound(String::new()), 404)]
    #[case(AppError::Storage(String::new()), 500)]
    #[case(AppError::Encoding(String::new()), 500)]
    #[case(AppError::Internal(String::new()), 500)]
    fn test_error_status_codes(#[case] error: AppError, #[case] status: u16) {
        assert_eq!(error.status_code(), status);
        assert_eq!(error.is_client_error(), status < 500);
    }

    #[test]
    fn test_error_display_is_the_message() {
        assert_eq!(
            AppError::bad_request("No file uploaded").to_string(),
            "No file uploaded"
        );
        assert_eq!(
            AppError::Encoding("QR generation failed".into()).to_string(),
            "QR generation failed"
        );
        assert_eq!(AppError::internal("boom").to_string(), "boom");
    }
}
