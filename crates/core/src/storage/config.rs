//! Storage configuration types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::StorageError;
use super::types::AudioUpload;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// Cloudinary media storage.
    Cloudinary {
        /// Cloud name.
        cloud_name: String,
        /// API key.
        api_key: String,
        /// API secret, used for signing uploads and basic auth on search.
        api_secret: String,
        /// Folder uploads are filed under.
        folder: String,
    },
    /// Local filesystem.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create Cloudinary provider.
    #[must_use]
    pub fn cloudinary(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        folder: impl Into<String>,
    ) -> Self {
        Self::Cloudinary {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            folder: folder.into(),
        }
    }

    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cloudinary { .. } => "cloudinary",
            Self::LocalFs { .. } => "local",
        }
    }

    /// Whether uploads must match the audio format allow-list.
    #[must_use]
    pub fn enforces_formats(&self) -> bool {
        matches!(self, Self::Cloudinary { .. })
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed audio file extensions, lower-case without the dot.
    pub allowed_formats: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 20 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_formats: Self::default_audio_formats(),
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Default audio formats accepted by the cloud variant.
    #[must_use]
    pub fn default_audio_formats() -> Vec<String> {
        ["mp3", "wav", "m4a", "aac", "ogg", "flac", "webm"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Check if a file extension is allowed.
    #[must_use]
    pub fn is_format_allowed(&self, extension: &str) -> bool {
        self.allowed_formats
            .iter()
            .any(|f| f.eq_ignore_ascii_case(extension))
    }

    /// Validate an upload against size and, when the provider requires it,
    /// format constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is too large or its format is not allowed.
    pub fn validate_upload(&self, upload: &AudioUpload) -> Result<(), StorageError> {
        let size = upload.size();
        if size > self.max_file_size {
            return Err(StorageError::file_too_large(size, self.max_file_size));
        }

        if self.provider.enforces_formats() {
            let extension = file_extension(&upload.original_name).unwrap_or_default();
            if !self.is_format_allowed(&extension) {
                return Err(StorageError::unsupported_format(extension));
            }
        }

        Ok(())
    }
}

/// Lower-cased extension of `filename`, without the dot.
pub(crate) fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
